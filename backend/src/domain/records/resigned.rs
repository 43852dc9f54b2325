//! Clearance tracking for resigned employees.

use serde::{Deserialize, Serialize};

use super::NOT_APPLICABLE;
use crate::domain::mutation::row_mut;
use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError, parse_date};

fn not_applicable() -> String {
    NOT_APPLICABLE.to_owned()
}

/// One resigned employee and their clearance state. Missing columns read
/// as `N/A`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResignedEmployee {
    /// Given name.
    #[serde(default = "not_applicable")]
    pub first_name: String,
    /// Surname.
    #[serde(default = "not_applicable")]
    pub last_name: String,
    /// Department.
    #[serde(default = "not_applicable")]
    pub department: String,
    /// Job title.
    #[serde(default = "not_applicable")]
    pub position: String,
    /// Start date.
    #[serde(default = "not_applicable")]
    pub start_date: String,
    /// Resignation date, `YYYY-MM-DD`.
    #[serde(default = "not_applicable")]
    pub date_resign: String,
    /// Last working day.
    #[serde(default = "not_applicable")]
    pub last_day_of_work: String,
    /// Safety boots issued.
    #[serde(default = "not_applicable")]
    pub issued_steel_toe: String,
    /// Tools issued.
    #[serde(default = "not_applicable")]
    pub issued_tools: String,
    /// Uniform issued.
    #[serde(default = "not_applicable")]
    pub issued_uniform: String,
    /// Clearance date.
    #[serde(default = "not_applicable")]
    pub date_cleared: String,
    /// Free remarks.
    #[serde(default = "not_applicable")]
    pub remarks: String,
    /// Final pay and certificate of employment.
    #[serde(rename = "Lastpay&Coe", default = "not_applicable")]
    pub last_pay_and_coe: String,
    /// Pending request.
    #[serde(rename = "Request", default = "not_applicable")]
    pub request: String,
    /// Clearance status.
    #[serde(rename = "Status", default = "not_applicable")]
    pub status: String,
}

impl Default for ResignedEmployee {
    fn default() -> Self {
        let na = not_applicable;
        Self {
            first_name: na(),
            last_name: na(),
            department: na(),
            position: na(),
            start_date: na(),
            date_resign: na(),
            last_day_of_work: na(),
            issued_steel_toe: na(),
            issued_tools: na(),
            issued_uniform: na(),
            date_cleared: na(),
            remarks: na(),
            last_pay_and_coe: na(),
            request: na(),
            status: na(),
        }
    }
}

/// The `resigned-employees` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResignedRoster(pub Vec<ResignedEmployee>);

impl CollectionDocument for ResignedRoster {
    const NAME: &'static str = "resigned-employees";
    const FILE_NAME: &'static str = "resignedemp.json";
}

impl ResignedRoster {
    /// Rows with a readable resignation date, the ones the clearance table
    /// lists.
    #[must_use]
    pub fn cleared_candidates(&self) -> impl Iterator<Item = &ResignedEmployee> {
        self.0
            .iter()
            .filter(|employee| parse_date(&employee.date_resign).is_some())
    }
}

/// Clearance columns open for editing. Identity columns are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceField {
    /// `lastDayOfWork`
    LastDayOfWork,
    /// `issuedSteelToe`
    IssuedSteelToe,
    /// `issuedTools`
    IssuedTools,
    /// `issuedUniform`
    IssuedUniform,
    /// `dateCleared`
    DateCleared,
    /// `remarks`
    Remarks,
    /// `Lastpay&Coe`
    LastPayAndCoe,
    /// `Request`
    Request,
    /// `Status`
    Status,
}

/// Edits to the clearance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResignedMutation {
    /// Overwrite one clearance cell; blank text is stored as `N/A`.
    Set {
        /// Row index.
        index: usize,
        /// Column.
        field: ClearanceField,
        /// New text.
        value: String,
    },
}

impl Mutation<ResignedRoster> for ResignedMutation {
    fn kind(&self) -> EditKind {
        EditKind::Field
    }

    fn apply(self, document: &mut ResignedRoster) -> Result<(), MutationError> {
        let Self::Set {
            index,
            field,
            value,
        } = self;
        let employee = row_mut(&mut document.0, index)?;
        let cell = match field {
            ClearanceField::LastDayOfWork => &mut employee.last_day_of_work,
            ClearanceField::IssuedSteelToe => &mut employee.issued_steel_toe,
            ClearanceField::IssuedTools => &mut employee.issued_tools,
            ClearanceField::IssuedUniform => &mut employee.issued_uniform,
            ClearanceField::DateCleared => &mut employee.date_cleared,
            ClearanceField::Remarks => &mut employee.remarks,
            ClearanceField::LastPayAndCoe => &mut employee.last_pay_and_coe,
            ClearanceField::Request => &mut employee.request,
            ClearanceField::Status => &mut employee.status,
        };
        let value = value.trim();
        *cell = if value.is_empty() {
            not_applicable()
        } else {
            value.to_owned()
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_columns_read_as_not_applicable() {
        let employee: ResignedEmployee = serde_json::from_str(
            r#"{"firstName":"Ana","dateResign":"2024-05-31","Lastpay&Coe":"Released"}"#,
        )
        .expect("row decodes");
        assert_eq!(employee.first_name, "Ana");
        assert_eq!(employee.last_pay_and_coe, "Released");
        assert_eq!(employee.issued_tools, NOT_APPLICABLE);
        assert_eq!(employee.status, NOT_APPLICABLE);
    }

    #[rstest]
    fn only_dated_resignations_are_listed() {
        let dated = ResignedEmployee {
            date_resign: "2024-05-31".to_owned(),
            ..ResignedEmployee::default()
        };
        let roster = ResignedRoster(vec![dated.clone(), ResignedEmployee::default()]);
        assert_eq!(roster.cleared_candidates().collect::<Vec<_>>(), vec![&dated]);
    }

    #[rstest]
    #[case("  ", NOT_APPLICABLE)]
    #[case(" 2024-06-03 ", "2024-06-03")]
    fn clearance_edits_trim_and_default(#[case] value: &str, #[case] expected: &str) {
        let mut roster = ResignedRoster(vec![ResignedEmployee::default()]);
        ResignedMutation::Set {
            index: 0,
            field: ClearanceField::DateCleared,
            value: value.to_owned(),
        }
        .apply(&mut roster)
        .expect("cell updated");
        assert_eq!(roster.0[0].date_cleared, expected);
    }
}
