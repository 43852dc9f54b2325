//! Absence requests and their approval workflow.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_date};

/// Action recorded while a request is still pending.
pub const PENDING_ACTION: &str = "Choose";

/// Actions a manager can take on a request.
pub const ABSENCE_ACTIONS: [&str; 6] = [
    PENDING_ACTION,
    "Given Memo",
    "Given Verbal",
    "Given Written",
    "Valid",
    "Cancelled",
];

const MASKED_CODE: &str = "******";

/// One absence request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Absence {
    /// Year the request was logged.
    pub year: LooseNumber,
    /// Logging date, `YYYY-MM-DD`.
    pub date_logged: String,
    /// Employee surname.
    pub last_name: String,
    /// Employee given name.
    pub first_name: String,
    /// Department.
    pub department: String,
    /// Position.
    pub position: String,
    /// Employment status.
    pub status: String,
    /// Stated reason.
    pub reason: String,
    /// First day absent.
    pub date_from: String,
    /// Last day absent.
    pub date_to: String,
    /// Inclusive day count.
    pub num_days: Option<LooseNumber>,
    /// Approving manager code, stored masked.
    pub manager_code: Option<String>,
    /// Manager decision.
    pub action_taken: Option<String>,
}

impl Absence {
    fn fill_defaults(&mut self) {
        self.num_days.get_or_insert_with(|| LooseNumber::text("0"));
        self.manager_code.get_or_insert_with(|| "N/A".to_owned());
        self.action_taken
            .get_or_insert_with(|| PENDING_ACTION.to_owned());
    }

    fn stamp(&mut self, today: NaiveDate) {
        self.year = i64::from(today.year()).into();
        self.date_logged = today.format("%Y-%m-%d").to_string();
        self.num_days = Some(inclusive_days(&self.date_from, &self.date_to));
    }
}

/// Inclusive number of days between two `YYYY-MM-DD` dates, at least 1.
/// Unusable dates yield `"0"`.
#[must_use]
pub fn inclusive_days(from: &str, to: &str) -> LooseNumber {
    match (parse_date(from), parse_date(to)) {
        (Some(from), Some(to)) => LooseNumber::from((to - from).num_days().saturating_add(1).max(1)),
        _ => LooseNumber::text("0"),
    }
}

/// The `absences` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsenceBook {
    /// Requests awaiting a decision.
    pub pending: Vec<Absence>,
    /// Decided requests.
    pub approved: Vec<Absence>,
}

impl CollectionDocument for AbsenceBook {
    const NAME: &'static str = "absences";
    const FILE_NAME: &'static str = "absences.json";

    fn fill_defaults(&mut self) {
        self.pending
            .iter_mut()
            .chain(self.approved.iter_mut())
            .for_each(Absence::fill_defaults);
    }
}

/// Manager codes accepted when filing a request.
///
/// This is a typo guard for the form, not an access control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerCodes(Vec<String>);

impl ManagerCodes {
    /// Codes used by the legacy form.
    pub const DEFAULTS: [&'static str; 5] = ["EXP0310", "MCD0410", "FCD0510", "DPS0610", "ADM0710"];

    /// Build from explicit codes, ignoring blanks.
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_owned())
                .filter(|code| !code.is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated list.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Whether `code` is on the list.
    #[must_use]
    pub fn accepts(&self, code: &str) -> bool {
        self.0.iter().any(|known| known == code.trim())
    }
}

impl Default for ManagerCodes {
    fn default() -> Self {
        Self::new(Self::DEFAULTS)
    }
}

/// Edits to the absence book.
#[derive(Debug, Clone, PartialEq)]
pub enum AbsenceMutation {
    /// File a new pending request.
    File {
        /// Request details; bookkeeping fields are overwritten.
        request: Absence,
        /// Code typed by the approving manager.
        manager_code: String,
        /// Accepted codes.
        codes: ManagerCodes,
        /// Filing date.
        today: NaiveDate,
    },
    /// Record a decision on a pending request.
    TakeAction {
        /// Index into `pending`.
        index: usize,
        /// One of [`ABSENCE_ACTIONS`].
        action: String,
        /// Decision date.
        today: NaiveDate,
    },
    /// Drop a pending request.
    Withdraw {
        /// Index into `pending`.
        index: usize,
    },
}

impl Mutation<AbsenceBook> for AbsenceMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut AbsenceBook) -> Result<(), MutationError> {
        match self {
            Self::File {
                mut request,
                manager_code,
                codes,
                today,
            } => {
                if !codes.accepts(&manager_code) {
                    return Err(MutationError::invalid("Invalid Manager Code"));
                }
                request.stamp(today);
                request.manager_code = Some(MASKED_CODE.to_owned());
                request.action_taken = Some(PENDING_ACTION.to_owned());
                document.pending.push(request);
            }
            Self::TakeAction {
                index,
                action,
                today,
            } => {
                if !ABSENCE_ACTIONS.contains(&action.as_str()) {
                    return Err(MutationError::invalid(format!("unknown action: {action}")));
                }
                let entry = row_mut(&mut document.pending, index)?;
                let decided = action != PENDING_ACTION;
                entry.action_taken = Some(action);
                if decided {
                    let mut entry = remove_row(&mut document.pending, index)?;
                    entry.stamp(today);
                    document.approved.push(entry);
                }
            }
            Self::Withdraw { index } => {
                remove_row(&mut document.pending, index)?;
            }
        }
        Ok(())
    }
}
