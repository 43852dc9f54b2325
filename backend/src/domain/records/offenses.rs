//! Disciplinary records per employee.

use serde::{Deserialize, Serialize};

use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError};

/// One recorded offense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offense {
    /// Incident date.
    pub date: String,
    /// Offense count for the employee.
    pub offense_num: String,
    /// Suspension days.
    pub suspensions: String,
    /// Offense category.
    #[serde(rename = "type")]
    pub kind: String,
    /// What happened.
    pub description: String,
    /// Notice-to-explain date.
    pub nte_date: String,
    /// Sanction applied.
    pub action_taken: String,
    /// `Pending`, `Resolved` or `Under Review`.
    pub status: String,
    /// Free comments.
    pub comments: String,
}

/// All offenses of one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseFile {
    /// Given name.
    pub fname: String,
    /// Surname.
    pub lname: String,
    /// Offenses in table order.
    pub offenses: Vec<Offense>,
}

/// The `offenses` document: a top-level array of employee files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffenseBook(pub Vec<OffenseFile>);

impl CollectionDocument for OffenseBook {
    const NAME: &'static str = "offenses";
    const FILE_NAME: &'static str = "offenses.json";
}

impl OffenseBook {
    /// Offenses on file for an employee; empty when there is no file.
    #[must_use]
    pub fn offenses_of(&self, fname: &str, lname: &str) -> &[Offense] {
        self.0
            .iter()
            .find(|file| file.fname == fname && file.lname == lname)
            .map_or(&[], |file| file.offenses.as_slice())
    }
}

/// Edits to the offense book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffenseMutation {
    /// Replace an employee's offense table, opening a file when none exists.
    Record(OffenseFile),
}

impl Mutation<OffenseBook> for OffenseMutation {
    fn kind(&self) -> EditKind {
        EditKind::Structural
    }

    fn apply(self, document: &mut OffenseBook) -> Result<(), MutationError> {
        let Self::Record(file) = self;
        if file.fname.trim().is_empty() || file.lname.trim().is_empty() {
            return Err(MutationError::invalid("fname and lname are required"));
        }
        match document
            .0
            .iter_mut()
            .find(|stored| stored.fname == file.fname && stored.lname == file.lname)
        {
            Some(stored) => stored.offenses = file.offenses,
            None => document.0.push(file),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(fname: &str, offenses: &[&str]) -> OffenseFile {
        OffenseFile {
            fname: fname.to_owned(),
            lname: "Reyes".to_owned(),
            offenses: offenses
                .iter()
                .map(|description| Offense {
                    description: (*description).to_owned(),
                    status: "Pending".to_owned(),
                    ..Offense::default()
                })
                .collect(),
        }
    }

    #[rstest]
    fn recording_replaces_the_table_of_a_known_employee() {
        let mut book = OffenseBook(vec![file("Ana", &["Late"]), file("Ben", &["AWOL"])]);
        OffenseMutation::Record(file("Ana", &["Late", "No ID"]))
            .apply(&mut book)
            .expect("offenses recorded");
        assert_eq!(book.0.len(), 2);
        assert_eq!(book.offenses_of("Ana", "Reyes").len(), 2);
        assert_eq!(book.offenses_of("Ben", "Reyes")[0].description, "AWOL");
    }

    #[rstest]
    fn recording_opens_a_file_for_a_new_employee() {
        let mut book = OffenseBook::default();
        OffenseMutation::Record(file("Cy", &["Late"]))
            .apply(&mut book)
            .expect("file opened");
        assert_eq!(book.offenses_of("Cy", "Reyes").len(), 1);
        assert!(book.offenses_of("Dee", "Reyes").is_empty());
    }

    #[rstest]
    fn offense_type_keeps_its_wire_name() {
        let offense: Offense =
            serde_json::from_str(r#"{"type":"Tardiness","nteDate":"2024-06-01"}"#)
                .expect("offense decodes");
        assert_eq!(offense.kind, "Tardiness");
        assert_eq!(offense.nte_date, "2024-06-01");
    }
}
