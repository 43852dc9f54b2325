//! Machining job board grouped by machine type.

use serde::{Deserialize, Serialize};

use crate::domain::mutation::row_mut;
use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError};

/// Status of a finished job.
pub const JOB_DONE: &str = "DONE";

/// One job on a machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachiningJob {
    /// Job date, `YYYY-MM-DD`.
    pub date: String,
    /// Part name.
    pub item_name: String,
    /// Part model.
    pub model: String,
    /// Operator name.
    pub operator: String,
    /// First process.
    pub process1: String,
    /// Second process.
    pub process2: String,
    /// Third process.
    pub process3: String,
    /// `DONE` once finished.
    pub status: String,
}

impl MachiningJob {
    /// Whether the job is finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.trim() == JOB_DONE
    }
}

/// Jobs on one machine type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineGroup {
    /// Machine type label.
    pub machine_type: String,
    /// Jobs in entry order.
    pub records: Vec<MachiningJob>,
}

/// The `machining` document: a top-level array of machine groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachiningBoard(pub Vec<MachineGroup>);

impl CollectionDocument for MachiningBoard {
    const NAME: &'static str = "machining";
    const FILE_NAME: &'static str = "machining.json";
}

impl MachiningBoard {
    /// The board as the page shows it: open jobs without a date, or jobs
    /// finished on `date`. Groups left without jobs are omitted.
    #[must_use]
    pub fn visible(&self, date: Option<&str>) -> Vec<MachineGroup> {
        let date = date.map(str::trim).filter(|date| !date.is_empty());
        self.0
            .iter()
            .map(|group| MachineGroup {
                machine_type: group.machine_type.clone(),
                records: group
                    .records
                    .iter()
                    .filter(|job| match date {
                        Some(date) => job.is_done() && job.date == date,
                        None => !job.is_done(),
                    })
                    .cloned()
                    .collect(),
            })
            .filter(|group| !group.records.is_empty())
            .collect()
    }

    fn group_mut(&mut self, machine_type: &str) -> Option<&mut MachineGroup> {
        self.0
            .iter_mut()
            .find(|group| group.machine_type == machine_type)
    }
}

/// Edits to the job board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachiningMutation {
    /// Add a job, creating the machine group when it is new.
    AddJob {
        /// Machine type.
        machine_type: String,
        /// Job to add.
        job: MachiningJob,
    },
    /// Replace a job in place.
    UpdateJob {
        /// Machine type.
        machine_type: String,
        /// Row index inside the group.
        index: usize,
        /// Updated job.
        job: MachiningJob,
    },
}

impl Mutation<MachiningBoard> for MachiningMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::AddJob { .. } => EditKind::Structural,
            Self::UpdateJob { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut MachiningBoard) -> Result<(), MutationError> {
        match self {
            Self::AddJob { machine_type, job } => {
                let machine_type = machine_type.trim();
                if machine_type.is_empty() {
                    return Err(MutationError::invalid("machineType is required"));
                }
                match document.group_mut(machine_type) {
                    Some(group) => group.records.push(job),
                    None => document.0.push(MachineGroup {
                        machine_type: machine_type.to_owned(),
                        records: vec![job],
                    }),
                }
            }
            Self::UpdateJob {
                machine_type,
                index,
                job,
            } => {
                let group =
                    document
                        .group_mut(&machine_type)
                        .ok_or_else(|| MutationError::NotFound {
                            what: "machine type",
                            key: machine_type.clone(),
                        })?;
                *row_mut(&mut group.records, index)? = job;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn job(date: &str, status: &str) -> MachiningJob {
        MachiningJob {
            date: date.to_owned(),
            item_name: "Shaft".to_owned(),
            status: status.to_owned(),
            ..MachiningJob::default()
        }
    }

    fn board() -> MachiningBoard {
        MachiningBoard(vec![
            MachineGroup {
                machine_type: "CNC".to_owned(),
                records: vec![job("2024-06-03", "DONE"), job("2024-06-03", "ONGOING")],
            },
            MachineGroup {
                machine_type: "Lathe".to_owned(),
                records: vec![job("2024-06-02", "DONE")],
            },
        ])
    }

    #[rstest]
    fn without_a_date_only_open_jobs_show() {
        let visible = board().visible(None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].records, vec![job("2024-06-03", "ONGOING")]);
    }

    #[rstest]
    #[case("2024-06-03", "CNC")]
    #[case("2024-06-02", "Lathe")]
    fn a_date_shows_jobs_finished_that_day(#[case] date: &str, #[case] machine: &str) {
        let visible = board().visible(Some(date));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].machine_type, machine);
        assert!(visible[0].records.iter().all(MachiningJob::is_done));
    }

    #[rstest]
    fn new_machine_types_open_a_group() {
        let mut board = board();
        MachiningMutation::AddJob {
            machine_type: " Mill ".to_owned(),
            job: job("2024-06-04", ""),
        }
        .apply(&mut board)
        .expect("job added");
        MachiningMutation::AddJob {
            machine_type: "CNC".to_owned(),
            job: job("2024-06-04", ""),
        }
        .apply(&mut board)
        .expect("job added");
        assert_eq!(board.0.len(), 3);
        assert_eq!(board.0[2].machine_type, "Mill");
        assert_eq!(board.0[0].records.len(), 3);
    }

    #[rstest]
    fn updates_need_a_known_machine_type() {
        let mut board = board();
        let error = MachiningMutation::UpdateJob {
            machine_type: "Press".to_owned(),
            index: 0,
            job: job("2024-06-04", "DONE"),
        }
        .apply(&mut board)
        .expect_err("unknown group");
        assert!(matches!(error, MutationError::NotFound { .. }));
    }
}
