//! Weekly machining output sheets.

use serde::{Deserialize, Serialize};

use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError};

/// Row status for parts that passed inspection.
pub const STATUS_GOOD: &str = "GOOD";
/// Row status for parts that failed inspection.
pub const STATUS_NOT_GOOD: &str = "NOT GOOD";
/// Label of the computed row over every inspected part.
pub const OUTPUT_TOTAL_LABEL: &str = "LT TOTAL OUTPUT";
/// Label of the computed row over parts delivered to the customer.
pub const DELIVERY_TOTAL_LABEL: &str = "DELIVERY TO MMTI";

/// Day columns in sheet order; the production week starts on Tuesday.
pub const WEEK_DAYS: [&str; 7] = [
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "monday",
];

/// One part line of a weekly sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRow {
    /// Part description.
    pub description: String,
    /// `GOOD`, `NOT GOOD` or blank.
    pub status: String,
    /// Pieces on Tuesday.
    pub tuesday: LooseNumber,
    /// Pieces on Wednesday.
    pub wednesday: LooseNumber,
    /// Pieces on Thursday.
    pub thursday: LooseNumber,
    /// Pieces on Friday.
    pub friday: LooseNumber,
    /// Pieces on Saturday.
    pub saturday: LooseNumber,
    /// Pieces on Sunday.
    pub sunday: LooseNumber,
    /// Pieces on Monday.
    pub monday: LooseNumber,
}

/// Inspection outcome of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inspection {
    /// Passed.
    Good,
    /// Failed.
    NotGood,
}

impl DailyRow {
    /// Day cells in [`WEEK_DAYS`] order.
    #[must_use]
    pub fn days(&self) -> [&LooseNumber; 7] {
        [
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
            &self.monday,
        ]
    }

    /// Parsed status; `None` for blank or unknown text.
    #[must_use]
    pub fn inspection(&self) -> Option<Inspection> {
        match self.status.trim() {
            STATUS_GOOD => Some(Inspection::Good),
            STATUS_NOT_GOOD => Some(Inspection::NotGood),
            _ => None,
        }
    }

    /// Whether this is one of the computed total rows.
    #[must_use]
    pub fn is_total_row(&self) -> bool {
        let label = self.description.trim();
        label == OUTPUT_TOTAL_LABEL || label == DELIVERY_TOTAL_LABEL
    }
}

/// Numeric value of a day cell, accepting thousands separators.
#[must_use]
pub fn day_value(cell: &LooseNumber) -> Option<f64> {
    match cell {
        LooseNumber::Text(text) => LooseNumber::text(text.replace(',', "")).value(),
        LooseNumber::Number(_) => cell.value(),
    }
}

/// One week of output for a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyWeek {
    /// Calendar year, number or text.
    pub year: LooseNumber,
    /// Week label, e.g. `Jun 4 - Jun 10`.
    pub week_range: String,
    /// Customer project.
    pub project_name: String,
    /// Part lines.
    pub rows: Vec<DailyRow>,
}

impl DailyWeek {
    /// Upsert key: the week label and the year as text.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        let year = match &self.year {
            LooseNumber::Number(number) => number.to_string(),
            LooseNumber::Text(text) => text.trim().to_owned(),
        };
        (self.week_range.trim().to_owned(), year)
    }

    fn validate(&self) -> Result<(), MutationError> {
        if self.week_range.trim().is_empty() {
            return Err(MutationError::invalid("weekRange is required"));
        }
        for row in &self.rows {
            if !row.status.trim().is_empty() && row.inspection().is_none() {
                return Err(MutationError::invalid(format!(
                    "unknown status for {}: {}",
                    row.description, row.status
                )));
            }
            let unreadable = WEEK_DAYS
                .into_iter()
                .zip(row.days())
                .find(|(_, cell)| !cell.is_blank() && day_value(cell).is_none());
            if let Some((day, _)) = unreadable {
                return Err(MutationError::invalid(format!(
                    "{day} of {} must be a number",
                    row.description
                )));
            }
        }
        Ok(())
    }
}

/// The `daily` document: a top-level array of weeks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySheet(pub Vec<DailyWeek>);

impl CollectionDocument for DailySheet {
    const NAME: &'static str = "daily";
    const FILE_NAME: &'static str = "daily.json";
}

/// Edits to the weekly sheets.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyMutation {
    /// Replace the project and rows of weeks already stored under the same
    /// key and append the rest. Computed total rows are dropped.
    Merge(Vec<DailyWeek>),
}

impl Mutation<DailySheet> for DailyMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut DailySheet) -> Result<(), MutationError> {
        let Self::Merge(weeks) = self;
        for week in &weeks {
            week.validate()?;
        }
        for mut week in weeks {
            week.rows.retain(|row| !row.is_total_row());
            let key = week.key();
            match document.0.iter_mut().find(|stored| stored.key() == key) {
                Some(stored) => {
                    stored.project_name = week.project_name;
                    stored.rows = week.rows;
                }
                None => document.0.push(week),
            }
        }
        Ok(())
    }
}
