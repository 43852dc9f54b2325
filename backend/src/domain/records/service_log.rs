//! Vehicle service and fuel log.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Total, sum_values};
use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_date};

/// One service, repair or fuel entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceEntry {
    /// Entry date, `YYYY-MM-DD`.
    pub date: String,
    /// Purchase order reference.
    pub po_number: String,
    /// Vehicle name.
    pub vehicle: String,
    /// Entry type, e.g. `Fuel` or `Repair`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Free text.
    pub description: String,
    /// Amount spent.
    pub cost: LooseNumber,
}

impl ServiceEntry {
    /// Whether this is a fuel purchase.
    #[must_use]
    pub fn is_fuel(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("fuel")
    }
}

/// The `service-log` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceLog(pub Vec<ServiceEntry>);

impl CollectionDocument for ServiceLog {
    const NAME: &'static str = "service-log";
    const FILE_NAME: &'static str = "log.json";
}

/// Table filter; unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    /// Exact vehicle name.
    pub vehicle: Option<String>,
    /// Calendar year of the entry date.
    pub year: Option<i32>,
    /// Month (1-12) of the entry date.
    pub month: Option<u32>,
}

impl LogFilter {
    /// Whether `entry` passes every set criterion. Entries with unreadable
    /// dates never pass a year or month criterion.
    #[must_use]
    pub fn matches(&self, entry: &ServiceEntry) -> bool {
        if self
            .vehicle
            .as_deref()
            .is_some_and(|vehicle| vehicle != entry.vehicle)
        {
            return false;
        }
        if self.year.is_none() && self.month.is_none() {
            return true;
        }
        let Some(date) = parse_date(&entry.date) else {
            return false;
        };
        self.year.is_none_or(|year| date.year() == year)
            && self.month.is_none_or(|month| date.month() == month)
    }
}

impl ServiceLog {
    /// Entries passing `filter`, in stored order.
    #[must_use]
    pub fn filtered<'a>(&'a self, filter: &'a LogFilter) -> impl Iterator<Item = &'a ServiceEntry> {
        self.0.iter().filter(move |entry| filter.matches(entry))
    }

    /// Total fuel spend over the filtered entries.
    #[must_use]
    pub fn fuel_total(&self, filter: &LogFilter) -> Total {
        sum_values(
            self.filtered(filter)
                .filter(|entry| entry.is_fuel())
                .map(|entry| &entry.cost),
        )
    }
}

/// Editable service log columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    /// `date`
    Date,
    /// `poNumber`
    PoNumber,
    /// `vehicle`
    Vehicle,
    /// `type`
    Kind,
    /// `description`
    Description,
    /// `cost`
    Cost,
}

/// Edits to the service log.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceLogMutation {
    /// Append an entry.
    Add(ServiceEntry),
    /// Overwrite one cell.
    Edit {
        /// Row index.
        index: usize,
        /// Column.
        field: ServiceField,
        /// New cell text.
        value: String,
    },
    /// Remove a row.
    Delete {
        /// Row index.
        index: usize,
    },
}

impl Mutation<ServiceLog> for ServiceLogMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Edit { .. } => EditKind::Field,
            Self::Add(_) | Self::Delete { .. } => EditKind::Structural,
        }
    }

    fn apply(self, document: &mut ServiceLog) -> Result<(), MutationError> {
        match self {
            Self::Add(entry) => document.0.push(entry),
            Self::Edit {
                index,
                field,
                value,
            } => {
                let entry = row_mut(&mut document.0, index)?;
                match field {
                    ServiceField::Date => entry.date = value,
                    ServiceField::PoNumber => entry.po_number = value,
                    ServiceField::Vehicle => entry.vehicle = value,
                    ServiceField::Kind => entry.kind = value,
                    ServiceField::Description => entry.description = value,
                    ServiceField::Cost => entry.cost = LooseNumber::Text(value),
                }
            }
            Self::Delete { index } => {
                remove_row(&mut document.0, index)?;
            }
        }
        Ok(())
    }
}
