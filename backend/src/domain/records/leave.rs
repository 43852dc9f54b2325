//! Annual leave credits.
//!
//! Each tenured employee gets five leave days per year. Days taken are
//! recorded as comma-separated dates in bi-monthly period columns; the
//! remaining balance is derived from them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::employees::Employee;
use crate::domain::mutation::row_mut;
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError, parse_date};

/// Leave days granted per year.
pub const ANNUAL_ALLOWANCE: i64 = 5;

/// Bi-monthly period columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeavePeriod {
    /// January and February.
    JanFeb,
    /// March and April.
    MarApr,
    /// May and June.
    MayJun,
    /// July and August.
    JulAug,
    /// September and October.
    SepOct,
}

impl LeavePeriod {
    /// Every column in display order.
    pub const ALL: [Self; 5] = [
        Self::JanFeb,
        Self::MarApr,
        Self::MayJun,
        Self::JulAug,
        Self::SepOct,
    ];
}

/// One employee's leave record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveCredit {
    /// Given name.
    pub fname: String,
    /// Surname.
    pub lname: String,
    /// Employment start date.
    pub start_date: String,
    /// Department.
    pub department: String,
    /// Dates taken in January and February.
    pub jan_feb: String,
    /// Dates taken in March and April.
    pub mar_apr: String,
    /// Dates taken in May and June.
    pub may_jun: String,
    /// Dates taken in July and August.
    pub jul_aug: String,
    /// Dates taken in September and October.
    pub sep_oct: String,
    /// Days left this year.
    pub remaining: Option<LooseNumber>,
}

impl LeaveCredit {
    /// The dates column for `period`.
    #[must_use]
    pub fn period(&self, period: LeavePeriod) -> &str {
        match period {
            LeavePeriod::JanFeb => &self.jan_feb,
            LeavePeriod::MarApr => &self.mar_apr,
            LeavePeriod::MayJun => &self.may_jun,
            LeavePeriod::JulAug => &self.jul_aug,
            LeavePeriod::SepOct => &self.sep_oct,
        }
    }

    fn period_mut(&mut self, period: LeavePeriod) -> &mut String {
        match period {
            LeavePeriod::JanFeb => &mut self.jan_feb,
            LeavePeriod::MarApr => &mut self.mar_apr,
            LeavePeriod::MayJun => &mut self.may_jun,
            LeavePeriod::JulAug => &mut self.jul_aug,
            LeavePeriod::SepOct => &mut self.sep_oct,
        }
    }

    /// Days recorded across all periods.
    #[must_use]
    pub fn days_used(&self) -> usize {
        LeavePeriod::ALL
            .iter()
            .map(|period| dates_in(self.period(*period)).count())
            .sum()
    }

    /// Drop dates from other years and recompute `remaining`.
    pub fn recalculate(&mut self, year: i32) {
        let start_date = self.start_date.trim().to_owned();
        for period in LeavePeriod::ALL {
            let column = self.period_mut(period);
            let kept: Vec<&str> = dates_in(column)
                .filter(|raw| {
                    *raw == start_date || parse_date(raw).is_some_and(|date| date.year() == year)
                })
                .collect();
            *column = kept.join(", ");
        }
        let used = i64::try_from(self.days_used()).unwrap_or(i64::MAX);
        self.remaining = Some((ANNUAL_ALLOWANCE - used).max(0).into());
    }

    fn matches(&self, employee: &Employee) -> bool {
        self.lname == employee.last_name && self.fname == employee.first_name
    }
}

fn dates_in(column: &str) -> impl Iterator<Item = &str> {
    column
        .split(',')
        .map(str::trim)
        .filter(|raw| raw.len() == 10 && parse_date(raw).is_some())
}

/// The `leave-credits` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveLedger(pub Vec<LeaveCredit>);

impl CollectionDocument for LeaveLedger {
    const NAME: &'static str = "leave-credits";
    const FILE_NAME: &'static str = "leavecredits.json";

    fn fill_defaults(&mut self) {
        for credit in &mut self.0 {
            credit
                .remaining
                .get_or_insert_with(|| ANNUAL_ALLOWANCE.into());
        }
    }
}

/// Whether `employee` has served at least a year on `today`.
#[must_use]
pub fn is_tenured(employee: &Employee, today: NaiveDate) -> bool {
    parse_date(&employee.start_date).is_some_and(|start| (today - start).num_days() >= 365)
}

/// Edits to the leave ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveMutation {
    /// Add a fresh record for each tenured employee without one.
    Enroll {
        /// Current employee directory.
        employees: Vec<Employee>,
        /// Reference date for tenure.
        today: NaiveDate,
    },
    /// Overwrite a period's dates and recompute the balance.
    SetPeriod {
        /// Row index.
        index: usize,
        /// Column.
        period: LeavePeriod,
        /// Comma-separated dates.
        dates: String,
        /// Reference date; only this year's dates are kept.
        today: NaiveDate,
    },
}

impl Mutation<LeaveLedger> for LeaveMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Enroll { .. } => EditKind::Structural,
            Self::SetPeriod { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut LeaveLedger) -> Result<(), MutationError> {
        match self {
            Self::Enroll { employees, today } => {
                for employee in employees.iter().filter(|e| is_tenured(e, today)) {
                    if document.0.iter().any(|credit| credit.matches(employee)) {
                        continue;
                    }
                    document.0.push(LeaveCredit {
                        fname: employee.first_name.clone(),
                        lname: employee.last_name.clone(),
                        start_date: employee.start_date.clone(),
                        department: employee.department.clone(),
                        remaining: Some(ANNUAL_ALLOWANCE.into()),
                        ..LeaveCredit::default()
                    });
                }
            }
            Self::SetPeriod {
                index,
                period,
                dates,
                today,
            } => {
                let credit = row_mut(&mut document.0, index)?;
                *credit.period_mut(period) = dates;
                credit.recalculate(today.year());
            }
        }
        Ok(())
    }
}
