//! Employee directory records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{CollectionDocument, EditKind, LooseNumber, Mutation, MutationError};

/// Placeholder for optional dates left blank on the form.
pub const NOT_APPLICABLE: &str = "N/A";

/// One employee.
///
/// Columns outside the known set are kept in `extra` so older documents
/// round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    /// Server-assigned identifier, `emp_` prefixed.
    pub id: String,
    /// Statutory classification.
    pub statutory: String,
    /// Surname.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Middle name.
    pub middle_name: String,
    /// Department.
    pub department: String,
    /// Active or resigned.
    pub status: String,
    /// Resignation date or `N/A`.
    pub date_resign: String,
    /// Job title.
    pub position: String,
    /// Start date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Employment type.
    pub employment_status: String,
    /// Regularisation date or `N/A`.
    pub regular_date: String,
    /// Contract state.
    pub contract_status: String,
    /// Phone number.
    pub contact_number: String,
    /// Birth date.
    pub birthdate: String,
    /// Home address.
    pub city_address: String,
    /// Email.
    pub email_address: String,
    /// Daily rate.
    pub rate_per_day: LooseNumber,
    /// Social security number.
    pub sss: String,
    /// Housing fund number.
    pub pagibig: String,
    /// Tax identification number.
    pub tin: String,
    /// Health insurance number.
    pub phil_health: String,
    /// Unrecognised columns.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A fresh `emp_` identifier.
#[must_use]
pub fn new_employee_id() -> String {
    format!("emp_{}", Uuid::new_v4().simple())
}

/// The `employees` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDirectory(pub Vec<Employee>);

impl CollectionDocument for EmployeeDirectory {
    const NAME: &'static str = "employees";
    const FILE_NAME: &'static str = "employees.json";
}

impl EmployeeDirectory {
    /// Look up an employee by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Employee> {
        self.0.iter().find(|employee| employee.id == id)
    }

    /// Add an employee under a new id and return the id.
    ///
    /// # Errors
    /// Refuses records without a first name, last name or position.
    pub fn add(&mut self, mut employee: Employee) -> Result<String, MutationError> {
        let complete = [&employee.first_name, &employee.last_name, &employee.position]
            .iter()
            .all(|value| !value.trim().is_empty());
        if !complete {
            return Err(MutationError::invalid("Invalid data received."));
        }
        for optional in [&mut employee.date_resign, &mut employee.regular_date] {
            if optional.trim().is_empty() {
                NOT_APPLICABLE.clone_into(optional);
            }
        }
        employee.id = new_employee_id();
        let id = employee.id.clone();
        self.0.push(employee);
        Ok(id)
    }

    /// Overwrite one column of an employee.
    ///
    /// Non-string values are stored as their JSON text.
    ///
    /// # Errors
    /// `NotFound` for an unknown id; `Invalid` for an unknown or read-only key.
    pub fn update_field(&mut self, id: &str, key: &str, value: Value) -> Result<(), MutationError> {
        let employee = self
            .0
            .iter_mut()
            .find(|employee| employee.id == id)
            .ok_or_else(|| MutationError::NotFound {
                what: "employee",
                key: id.to_owned(),
            })?;
        let invalid_key = || MutationError::invalid("Invalid key.");
        if key == "id" {
            return Err(invalid_key());
        }
        let Value::Object(mut columns) =
            serde_json::to_value(&*employee).map_err(|err| MutationError::invalid(err.to_string()))?
        else {
            return Err(invalid_key());
        };
        let slot = columns.get_mut(key).ok_or_else(invalid_key)?;
        *slot = Value::String(match value {
            Value::String(text) => text,
            other => other.to_string(),
        });
        *employee = serde_json::from_value(Value::Object(columns))
            .map_err(|err| MutationError::invalid(err.to_string()))?;
        Ok(())
    }
}

/// Edits to the employee directory.
#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeMutation {
    /// Add an employee with a new id.
    Add(Employee),
    /// Overwrite one column.
    Update {
        /// Employee id.
        id: String,
        /// Column name as stored, e.g. `lastName`.
        key: String,
        /// New value.
        value: Value,
    },
}

impl Mutation<EmployeeDirectory> for EmployeeMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Add(_) => EditKind::Structural,
            Self::Update { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut EmployeeDirectory) -> Result<(), MutationError> {
        match self {
            Self::Add(employee) => document.add(employee).map(drop),
            Self::Update { id, key, value } => document.update_field(&id, &key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn hire(first: &str, last: &str, position: &str) -> Employee {
        Employee {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            position: position.to_owned(),
            ..Employee::default()
        }
    }

    #[fixture]
    fn directory() -> (EmployeeDirectory, String) {
        let mut directory = EmployeeDirectory::default();
        let id = directory
            .add(hire("Ana", "Reyes", "Machinist"))
            .expect("employee added");
        (directory, id)
    }

    #[rstest]
    fn added_employees_get_prefixed_ids_and_placeholders(directory: (EmployeeDirectory, String)) {
        let (directory, id) = directory;
        assert!(id.starts_with("emp_"));
        let employee = directory.find(&id).expect("employee stored");
        assert_eq!(employee.date_resign, NOT_APPLICABLE);
        assert_eq!(employee.regular_date, NOT_APPLICABLE);
    }

    #[rstest]
    #[case(hire("", "Reyes", "Machinist"))]
    #[case(hire("Ana", " ", "Machinist"))]
    #[case(hire("Ana", "Reyes", ""))]
    fn incomplete_hires_are_refused(#[case] employee: Employee) {
        let mut directory = EmployeeDirectory::default();
        assert!(directory.add(employee).is_err());
        assert!(directory.0.is_empty());
    }

    #[rstest]
    fn updates_overwrite_a_known_column(directory: (EmployeeDirectory, String)) {
        let (mut directory, id) = directory;
        directory
            .update_field(&id, "department", json!("Warehouse"))
            .expect("department updated");
        directory
            .update_field(&id, "ratePerDay", json!(650))
            .expect("rate updated");
        let employee = directory.find(&id).expect("employee stored");
        assert_eq!(employee.department, "Warehouse");
        assert_eq!(employee.rate_per_day.value(), Some(650.0));
    }

    #[rstest]
    #[case("nickname")]
    #[case("id")]
    fn unknown_keys_are_refused(directory: (EmployeeDirectory, String), #[case] key: &str) {
        let (mut directory, id) = directory;
        let before = directory.clone();
        let result = directory.update_field(&id, key, json!("x"));
        assert_eq!(result, Err(MutationError::invalid("Invalid key.")));
        assert_eq!(directory, before);
    }

    #[rstest]
    fn unknown_ids_are_not_found(directory: (EmployeeDirectory, String)) {
        let (mut directory, _) = directory;
        let result = directory.update_field("emp_missing", "department", json!("x"));
        assert!(matches!(result, Err(MutationError::NotFound { .. })));
    }

    #[rstest]
    fn extra_columns_survive_and_are_editable() {
        let mut directory: EmployeeDirectory =
            serde_json::from_value(json!([{"id": "emp_1", "lastName": "Cruz", "shoeSize": "9"}]))
                .expect("directory decodes");
        directory
            .update_field("emp_1", "shoeSize", json!("10"))
            .expect("extra column updated");
        let stored = serde_json::to_value(&directory).expect("directory encodes");
        assert_eq!(stored[0]["shoeSize"], json!("10"));
        assert_eq!(stored[0]["lastName"], json!("Cruz"));
    }
}
