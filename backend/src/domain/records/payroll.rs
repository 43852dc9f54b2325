//! Payroll rates per employee.

use serde::{Deserialize, Serialize};

use super::NOT_APPLICABLE;
use crate::domain::mutation::row_mut;
use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError};

/// Department recorded when the form leaves it blank.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// One payroll line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollRecord {
    /// Employee name as shown on the payslip.
    pub full_name: String,
    /// Department.
    pub department: String,
    /// Monthly rate.
    pub monthly: LooseNumber,
    /// Daily rate.
    pub daily: LooseNumber,
    /// Allowance.
    pub allowance: LooseNumber,
    /// Date of the last increase or `N/A`.
    pub last_increase: String,
    /// Date of the increase before that or `N/A`.
    pub prev_increase: String,
}

impl PayrollRecord {
    /// Fill blank columns the way the add form does.
    fn with_form_defaults(mut self) -> Result<Self, MutationError> {
        if self.full_name.trim().is_empty() {
            return Err(MutationError::invalid("fullName is required"));
        }
        if self.department.trim().is_empty() {
            UNKNOWN_DEPARTMENT.clone_into(&mut self.department);
        }
        for rate in [&mut self.monthly, &mut self.daily, &mut self.allowance] {
            if rate.is_blank() {
                *rate = LooseNumber::from(0);
            }
        }
        for date in [&mut self.last_increase, &mut self.prev_increase] {
            if date.trim().is_empty() {
                NOT_APPLICABLE.clone_into(date);
            }
        }
        Ok(self)
    }
}

/// The `payroll` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payroll(pub Vec<PayrollRecord>);

impl CollectionDocument for Payroll {
    const NAME: &'static str = "payroll";
    const FILE_NAME: &'static str = "payroll.json";
}

/// Table filter; unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayrollFilter {
    /// Department, any case.
    pub department: Option<String>,
    /// Part of the name, any case.
    pub name: Option<String>,
}

impl PayrollFilter {
    /// Whether `record` passes every set criterion.
    #[must_use]
    pub fn matches(&self, record: &PayrollRecord) -> bool {
        let department = self
            .department
            .as_deref()
            .map(str::trim)
            .filter(|wanted| !wanted.is_empty())
            .is_none_or(|wanted| record.department.trim().eq_ignore_ascii_case(wanted));
        let name = self
            .name
            .as_deref()
            .map(|wanted| wanted.trim().to_lowercase())
            .filter(|wanted| !wanted.is_empty())
            .is_none_or(|wanted| record.full_name.to_lowercase().contains(&wanted));
        department && name
    }
}

impl Payroll {
    /// Records passing `filter`, in stored order.
    #[must_use]
    pub fn filtered(&self, filter: &PayrollFilter) -> Vec<PayrollRecord> {
        self.0
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }
}

/// Editable payroll columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollField {
    /// `fullName`
    FullName,
    /// `department`
    Department,
    /// `monthly`
    Monthly,
    /// `daily`
    Daily,
    /// `allowance`
    Allowance,
    /// `lastIncrease`
    LastIncrease,
    /// `prevIncrease`
    PrevIncrease,
}

/// A submission to the payroll endpoint: a full list or one new record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PayrollSubmission {
    /// The whole table, replacing what is stored.
    Table(Vec<PayrollRecord>),
    /// A record to append.
    Record(PayrollRecord),
}

/// Edits to the payroll table.
#[derive(Debug, Clone, PartialEq)]
pub enum PayrollMutation {
    /// Append one record with form defaults applied.
    Append(PayrollRecord),
    /// Replace the whole table.
    Overwrite(Vec<PayrollRecord>),
    /// Overwrite one cell. Blank rates become `0` and blank text `N/A`.
    Set {
        /// Row index.
        index: usize,
        /// Column.
        field: PayrollField,
        /// New cell text.
        value: String,
    },
}

impl From<PayrollSubmission> for PayrollMutation {
    fn from(submission: PayrollSubmission) -> Self {
        match submission {
            PayrollSubmission::Table(records) => Self::Overwrite(records),
            PayrollSubmission::Record(record) => Self::Append(record),
        }
    }
}

impl Mutation<Payroll> for PayrollMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Append(_) | Self::Overwrite(_) => EditKind::Structural,
            Self::Set { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut Payroll) -> Result<(), MutationError> {
        match self {
            Self::Append(record) => document.0.push(record.with_form_defaults()?),
            Self::Overwrite(records) => document.0 = records,
            Self::Set {
                index,
                field,
                value,
            } => {
                let record = row_mut(&mut document.0, index)?;
                let value = value.trim();
                let rate = |cell: &mut LooseNumber| {
                    *cell = if value.is_empty() {
                        LooseNumber::from(0)
                    } else {
                        LooseNumber::text(value)
                    };
                };
                let text = |cell: &mut String| {
                    *cell = if value.is_empty() {
                        NOT_APPLICABLE.to_owned()
                    } else {
                        value.to_owned()
                    };
                };
                match field {
                    PayrollField::FullName => text(&mut record.full_name),
                    PayrollField::Department => text(&mut record.department),
                    PayrollField::Monthly => rate(&mut record.monthly),
                    PayrollField::Daily => rate(&mut record.daily),
                    PayrollField::Allowance => rate(&mut record.allowance),
                    PayrollField::LastIncrease => text(&mut record.last_increase),
                    PayrollField::PrevIncrease => text(&mut record.prev_increase),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(name: &str, department: &str) -> PayrollRecord {
        PayrollRecord {
            full_name: name.to_owned(),
            department: department.to_owned(),
            monthly: LooseNumber::from(18_000),
            ..PayrollRecord::default()
        }
    }

    #[rstest]
    fn appended_records_get_form_defaults() {
        let mut payroll = Payroll::default();
        PayrollMutation::Append(record("Ana Reyes", " "))
            .apply(&mut payroll)
            .expect("record appended");
        let stored = &payroll.0[0];
        assert_eq!(stored.department, UNKNOWN_DEPARTMENT);
        assert_eq!(stored.monthly, LooseNumber::from(18_000));
        assert_eq!(stored.daily, LooseNumber::from(0));
        assert_eq!(stored.last_increase, NOT_APPLICABLE);
    }

    #[rstest]
    fn nameless_records_are_refused() {
        let mut payroll = Payroll::default();
        let error = PayrollMutation::Append(record("", "HR"))
            .apply(&mut payroll)
            .expect_err("name required");
        assert!(matches!(error, MutationError::Invalid { .. }));
        assert!(payroll.0.is_empty());
    }

    #[rstest]
    fn submissions_choose_between_overwrite_and_append() {
        let table: PayrollSubmission =
            serde_json::from_str(r#"[{"fullName":"Ana"},{"fullName":"Ben"}]"#)
                .expect("table decodes");
        let single: PayrollSubmission =
            serde_json::from_str(r#"{"fullName":"Cy","department":"HR"}"#)
                .expect("record decodes");

        let mut payroll = Payroll(vec![record("Old", "HR")]);
        PayrollMutation::from(table)
            .apply(&mut payroll)
            .expect("table stored");
        assert_eq!(payroll.0.len(), 2);
        PayrollMutation::from(single)
            .apply(&mut payroll)
            .expect("record stored");
        assert_eq!(payroll.0.len(), 3);
        assert_eq!(payroll.0[2].full_name, "Cy");
    }

    #[rstest]
    #[case(PayrollField::Allowance, "", |r: &PayrollRecord| r.allowance == LooseNumber::from(0))]
    #[case(PayrollField::LastIncrease, " ", |r: &PayrollRecord| r.last_increase == NOT_APPLICABLE)]
    #[case(PayrollField::Daily, "850", |r: &PayrollRecord| r.daily == LooseNumber::text("850"))]
    fn cell_edits_apply_blank_defaults(
        #[case] field: PayrollField,
        #[case] value: &str,
        #[case] check: fn(&PayrollRecord) -> bool,
    ) {
        let mut payroll = Payroll(vec![record("Ana", "HR")]);
        PayrollMutation::Set {
            index: 0,
            field,
            value: value.to_owned(),
        }
        .apply(&mut payroll)
        .expect("cell updated");
        assert!(check(&payroll.0[0]));
    }

    #[rstest]
    fn filter_matches_department_and_name_in_any_case() {
        let payroll = Payroll(vec![
            record("Ana Reyes", "Machining"),
            record("Ben Cruz", "Machining"),
            record("Ana Santos", "HR"),
        ]);
        let filter = PayrollFilter {
            department: Some("machining".to_owned()),
            name: Some("ANA".to_owned()),
        };
        let names: Vec<_> = payroll
            .filtered(&filter)
            .into_iter()
            .map(|record| record.full_name)
            .collect();
        assert_eq!(names, ["Ana Reyes"]);
    }
}
