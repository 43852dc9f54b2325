//! Machining production quota sheets and the call-out roster.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError};

/// Hourly cells per shift row.
pub const HOURS_PER_SHIFT: usize = 8;

/// One operator's production row for a shift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaEntry {
    /// Production date, `YYYY-MM-DD`.
    pub date: String,
    /// Operator name.
    pub operator: String,
    /// Part being produced.
    pub item_name: String,
    /// Pieces required for the shift.
    pub quota: LooseNumber,
    /// Machine label.
    pub machine: String,
    /// Pieces produced per hour; blank cells are not entered yet. Rows
    /// stored without the column decode with a full shift of blank cells.
    #[serde(default = "blank_hours")]
    pub times: Vec<LooseNumber>,
    /// Sum of the hourly cells.
    pub total: LooseNumber,
}

fn blank_hours() -> Vec<LooseNumber> {
    vec![LooseNumber::default(); HOURS_PER_SHIFT]
}

impl QuotaEntry {
    /// A blank row dated `date`.
    #[must_use]
    pub fn blank(date: NaiveDate) -> Self {
        let mut entry = Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Self::default()
        };
        entry.normalise();
        entry
    }

    /// Sum of the numeric hourly cells.
    #[must_use]
    pub fn hourly_sum(&self) -> f64 {
        self.times.iter().filter_map(LooseNumber::value).sum()
    }

    /// Pad the hourly cells and recompute the total. Quota edits call this;
    /// stored rows are kept exactly as written.
    pub fn normalise(&mut self) {
        if self.times.len() < HOURS_PER_SHIFT {
            self.times.resize(HOURS_PER_SHIFT, LooseNumber::default());
        }
        self.total = LooseNumber::from_f64(self.hourly_sum());
    }
}

/// Shift selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shift {
    /// Day shift (`shift1`).
    #[serde(rename = "shift1")]
    First,
    /// Night shift (`shift2`).
    #[serde(rename = "shift2")]
    Second,
}

/// The `quota` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaSheet {
    /// Day shift rows.
    pub shift1: Vec<QuotaEntry>,
    /// Night shift rows.
    pub shift2: Vec<QuotaEntry>,
}

impl CollectionDocument for QuotaSheet {
    const NAME: &'static str = "quota";
    const FILE_NAME: &'static str = "quota.json";
}

impl QuotaSheet {
    /// Rows of one shift.
    #[must_use]
    pub fn rows(&self, shift: Shift) -> &[QuotaEntry] {
        match shift {
            Shift::First => &self.shift1,
            Shift::Second => &self.shift2,
        }
    }

    fn rows_mut(&mut self, shift: Shift) -> &mut Vec<QuotaEntry> {
        match shift {
            Shift::First => &mut self.shift1,
            Shift::Second => &mut self.shift2,
        }
    }

    /// Every row tagged with its shift.
    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = (Shift, &QuotaEntry)> {
        self.shift1
            .iter()
            .map(|entry| (Shift::First, entry))
            .chain(self.shift2.iter().map(|entry| (Shift::Second, entry)))
    }
}

/// Text columns of a quota row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaTextField {
    /// `date`
    Date,
    /// `operator`
    Operator,
    /// `itemName`
    ItemName,
    /// `machine`
    Machine,
}

/// Edits to the quota sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaMutation {
    /// Append a blank row.
    AddRow {
        /// Target shift.
        shift: Shift,
        /// Production date.
        date: NaiveDate,
    },
    /// Remove a row.
    DeleteRow {
        /// Target shift.
        shift: Shift,
        /// Row index.
        index: usize,
    },
    /// Overwrite a text cell.
    SetText {
        /// Target shift.
        shift: Shift,
        /// Row index.
        index: usize,
        /// Column.
        field: QuotaTextField,
        /// New text.
        value: String,
    },
    /// Overwrite the required pieces.
    SetQuota {
        /// Target shift.
        shift: Shift,
        /// Row index.
        index: usize,
        /// New cell text.
        value: String,
    },
    /// Overwrite one hourly cell and recompute the total.
    SetHour {
        /// Target shift.
        shift: Shift,
        /// Row index.
        index: usize,
        /// Hour slot, `0..8`.
        hour: usize,
        /// New cell text.
        value: String,
    },
}

impl Mutation<QuotaSheet> for QuotaMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::AddRow { .. } | Self::DeleteRow { .. } => EditKind::Structural,
            Self::SetText { .. } | Self::SetQuota { .. } | Self::SetHour { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut QuotaSheet) -> Result<(), MutationError> {
        match self {
            Self::AddRow { shift, date } => document.rows_mut(shift).push(QuotaEntry::blank(date)),
            Self::DeleteRow { shift, index } => {
                remove_row(document.rows_mut(shift), index)?;
            }
            Self::SetText {
                shift,
                index,
                field,
                value,
            } => {
                let entry = row_mut(document.rows_mut(shift), index)?;
                match field {
                    QuotaTextField::Date => entry.date = value,
                    QuotaTextField::Operator => entry.operator = value,
                    QuotaTextField::ItemName => entry.item_name = value,
                    QuotaTextField::Machine => entry.machine = value,
                }
            }
            Self::SetQuota {
                shift,
                index,
                value,
            } => {
                row_mut(document.rows_mut(shift), index)?.quota = LooseNumber::Text(value);
            }
            Self::SetHour {
                shift,
                index,
                hour,
                value,
            } => {
                if hour >= HOURS_PER_SHIFT {
                    return Err(MutationError::invalid(format!(
                        "hour slot {hour} is outside the shift"
                    )));
                }
                let entry = row_mut(document.rows_mut(shift), index)?;
                entry.normalise();
                if let Some(cell) = entry.times.get_mut(hour) {
                    *cell = LooseNumber::Text(value.trim().to_owned());
                }
                entry.normalise();
            }
        }
        Ok(())
    }
}

/// The `done-roster` document: operators already called out, per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoneRoster(pub BTreeMap<String, Vec<String>>);

impl CollectionDocument for DoneRoster {
    const NAME: &'static str = "done-roster";
    const FILE_NAME: &'static str = "doneemployees.json";
}

impl DoneRoster {
    /// Operators marked done on `date`.
    #[must_use]
    pub fn names_on(&self, date: &str) -> &[String] {
        self.0.get(date).map_or(&[], Vec::as_slice)
    }

    /// Record `name` as done on `date`. Returns `false` when already present.
    ///
    /// # Errors
    /// Refuses blank dates or names.
    pub fn mark_done(&mut self, date: &str, name: &str) -> Result<bool, MutationError> {
        let (date, name) = (date.trim(), name.trim());
        if date.is_empty() || name.is_empty() {
            return Err(MutationError::invalid("Invalid input"));
        }
        let names = self.0.entry(date.to_owned()).or_default();
        if names.iter().any(|existing| existing == name) {
            return Ok(false);
        }
        names.push(name.to_owned());
        Ok(true)
    }
}
