//! Project assignments and their history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_date};

/// Timestamp format of history entries.
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One employee assigned to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    /// Surname.
    pub lname: String,
    /// Given name.
    pub fname: String,
    /// Role on the project.
    pub position: String,
    /// Home department.
    pub department: String,
    /// Project name.
    pub project: String,
    /// First assigned day.
    pub date_from: String,
    /// Last assigned day.
    pub date_to: String,
    /// Length of the assignment in days.
    pub num_days: LooseNumber,
}

/// Whole days between two dates regardless of order; `0` when unusable.
#[must_use]
pub fn days_between(from: &str, to: &str) -> i64 {
    match (parse_date(from), parse_date(to)) {
        (Some(from), Some(to)) => (to - from).num_days().abs(),
        _ => 0,
    }
}

/// The `assignments` document: the current roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentRoster(pub Vec<Assignment>);

impl CollectionDocument for AssignmentRoster {
    const NAME: &'static str = "assignments";
    const FILE_NAME: &'static str = "empassign.json";
}

impl AssignmentRoster {
    /// Assignments grouped by project, in first-seen project order.
    #[must_use]
    pub fn by_project(&self) -> Vec<(&str, Vec<&Assignment>)> {
        let mut groups: Vec<(&str, Vec<&Assignment>)> = Vec::new();
        for assignment in &self.0 {
            match groups
                .iter_mut()
                .find(|(project, _)| *project == assignment.project)
            {
                Some((_, members)) => members.push(assignment),
                None => groups.push((assignment.project.as_str(), vec![assignment])),
            }
        }
        groups
    }
}

/// An assignment as it stood when the roster was saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentRecord {
    /// The assignment.
    #[serde(flatten)]
    pub assignment: Assignment,
    /// Save time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// The `assignment-history` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentHistory(pub Vec<AssignmentRecord>);

impl CollectionDocument for AssignmentHistory {
    const NAME: &'static str = "assignment-history";
    const FILE_NAME: &'static str = "empassign2.json";
}

impl AssignmentHistory {
    /// Append every entry of `roster` stamped with `at`.
    pub fn record(&mut self, roster: &AssignmentRoster, at: NaiveDateTime) {
        let timestamp = at.format(HISTORY_TIMESTAMP_FORMAT).to_string();
        self.0
            .extend(roster.0.iter().cloned().map(|assignment| AssignmentRecord {
                assignment,
                timestamp: timestamp.clone(),
            }));
    }

    /// Entries matching every non-blank filter. Text filters are
    /// case-insensitive substrings; `date` matches either end exactly.
    #[must_use]
    pub fn search(&self, filter: &HistoryFilter) -> Vec<&AssignmentRecord> {
        self.0.iter().filter(|record| filter.matches(record)).collect()
    }
}

/// History search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryFilter {
    /// Surname fragment.
    pub lname: String,
    /// Given name fragment.
    pub fname: String,
    /// Department fragment.
    pub department: String,
    /// Project fragment.
    pub project: String,
    /// Exact start or end date.
    pub date: String,
}

impl HistoryFilter {
    fn matches(&self, record: &AssignmentRecord) -> bool {
        let entry = &record.assignment;
        let contains = |haystack: &str, needle: &str| {
            needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
        };
        contains(&entry.lname, &self.lname)
            && contains(&entry.fname, &self.fname)
            && contains(&entry.department, &self.department)
            && contains(&entry.project, &self.project)
            && (self.date.is_empty() || entry.date_from == self.date || entry.date_to == self.date)
    }
}

/// Editable assignment columns. The project is changed by reassignment only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentField {
    /// `lname`
    Lname,
    /// `fname`
    Fname,
    /// `position`
    Position,
    /// `department`
    Department,
    /// `dateFrom`
    DateFrom,
    /// `dateTo`
    DateTo,
    /// `numDays`
    NumDays,
}

/// Edits to the current roster.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentMutation {
    /// Add an assignment.
    Assign(Assignment),
    /// Overwrite one cell.
    Edit {
        /// Row index.
        index: usize,
        /// Column.
        field: AssignmentField,
        /// New text, trimmed.
        value: String,
    },
    /// Move an employee to another project; the entry goes to the end.
    Reassign {
        /// Row index.
        index: usize,
        /// New project.
        project: String,
        /// New start date.
        date_from: String,
        /// New end date.
        date_to: String,
        /// New position.
        position: String,
    },
    /// Remove an assignment.
    Remove {
        /// Row index.
        index: usize,
    },
}

impl Mutation<AssignmentRoster> for AssignmentMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Edit { .. } => EditKind::Field,
            Self::Assign(_) | Self::Reassign { .. } | Self::Remove { .. } => EditKind::Structural,
        }
    }

    fn apply(self, document: &mut AssignmentRoster) -> Result<(), MutationError> {
        match self {
            Self::Assign(mut assignment) => {
                if assignment.project.trim().is_empty() {
                    return Err(MutationError::invalid("an assignment needs a project"));
                }
                if assignment.num_days.is_blank() {
                    assignment.num_days =
                        days_between(&assignment.date_from, &assignment.date_to).into();
                }
                document.0.push(assignment);
            }
            Self::Edit {
                index,
                field,
                value,
            } => {
                let entry = row_mut(&mut document.0, index)?;
                let value = value.trim().to_owned();
                match field {
                    AssignmentField::Lname => entry.lname = value,
                    AssignmentField::Fname => entry.fname = value,
                    AssignmentField::Position => entry.position = value,
                    AssignmentField::Department => entry.department = value,
                    AssignmentField::DateFrom => entry.date_from = value,
                    AssignmentField::DateTo => entry.date_to = value,
                    AssignmentField::NumDays => entry.num_days = LooseNumber::Text(value),
                }
            }
            Self::Reassign {
                index,
                project,
                date_from,
                date_to,
                position,
            } => {
                let answers = [&project, &date_from, &date_to, &position];
                if answers.iter().any(|answer| answer.trim().is_empty()) {
                    return Err(MutationError::invalid(
                        "reassignment needs a project, dates and a position",
                    ));
                }
                let current = remove_row(&mut document.0, index)?;
                document.0.push(Assignment {
                    num_days: days_between(&date_from, &date_to).into(),
                    project,
                    date_from,
                    date_to,
                    position,
                    ..current
                });
            }
            Self::Remove { index } => {
                remove_row(&mut document.0, index)?;
            }
        }
        Ok(())
    }
}
