//! HR to-do list.

use serde::{Deserialize, Serialize};

use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError};

/// One task. Tasks are identified by their text and creation time together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// What needs doing.
    pub text: String,
    /// Creation time as written by the page.
    pub time: String,
    /// Ticked off.
    pub completed: bool,
}

impl Task {
    fn same_task(&self, other: &Self) -> bool {
        self.text == other.text && self.time == other.time
    }
}

/// The `todo` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList(pub Vec<Task>);

impl CollectionDocument for TodoList {
    const NAME: &'static str = "todo";
    const FILE_NAME: &'static str = "todo.json";
}

/// Request body of the to-do endpoint, dispatched on `action`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TodoRequest {
    /// Append a task.
    Add {
        /// New task.
        task: Task,
    },
    /// Read the list.
    Load,
    /// Copy `completed` onto the matching task.
    Update {
        /// Task carrying the new flag.
        task: Task,
    },
    /// Remove the matching task.
    Delete {
        /// Task to remove.
        task: Task,
    },
}

impl TodoRequest {
    /// The edit this request makes; `None` for reads.
    #[must_use]
    pub fn into_mutation(self) -> Option<TodoMutation> {
        match self {
            Self::Add { task } => Some(TodoMutation::Add(task)),
            Self::Load => None,
            Self::Update { task } => Some(TodoMutation::SetCompleted(task)),
            Self::Delete { task } => Some(TodoMutation::Delete(task)),
        }
    }
}

/// Edits to the to-do list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoMutation {
    /// Append a task.
    Add(Task),
    /// Set `completed` on the task with the same text and time.
    SetCompleted(Task),
    /// Remove every task with the same text and time. Removing a task that
    /// is already gone is not an error.
    Delete(Task),
}

impl Mutation<TodoList> for TodoMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::Add(_) | Self::Delete(_) => EditKind::Structural,
            Self::SetCompleted(_) => EditKind::Field,
        }
    }

    fn apply(self, document: &mut TodoList) -> Result<(), MutationError> {
        match self {
            Self::Add(task) => {
                if task.text.trim().is_empty() {
                    return Err(MutationError::invalid("task text is required"));
                }
                document.0.push(task);
            }
            Self::SetCompleted(update) => {
                let mut found = false;
                for task in document.0.iter_mut().filter(|task| task.same_task(&update)) {
                    task.completed = update.completed;
                    found = true;
                }
                if !found {
                    return Err(MutationError::NotFound {
                        what: "task",
                        key: update.text,
                    });
                }
            }
            Self::Delete(target) => document.0.retain(|task| !task.same_task(&target)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn task(text: &str, time: &str) -> Task {
        Task {
            text: text.to_owned(),
            time: time.to_owned(),
            completed: false,
        }
    }

    #[rstest]
    #[case(r#"{"action":"load"}"#, TodoRequest::Load)]
    #[case(
        r#"{"action":"add","task":{"text":"Call SSS","time":"09:00"}}"#,
        TodoRequest::Add { task: task("Call SSS", "09:00") }
    )]
    fn requests_dispatch_on_action(#[case] raw: &str, #[case] expected: TodoRequest) {
        let request: TodoRequest = serde_json::from_str(raw).expect("request decodes");
        assert_eq!(request, expected);
    }

    #[rstest]
    fn unknown_actions_do_not_decode() {
        let result = serde_json::from_str::<TodoRequest>(r#"{"action":"archive"}"#);
        assert!(result.is_err());
    }

    #[rstest]
    fn updates_match_on_text_and_time() {
        let mut list = TodoList(vec![task("Call SSS", "09:00"), task("Call SSS", "10:00")]);
        let mut done = task("Call SSS", "10:00");
        done.completed = true;
        TodoMutation::SetCompleted(done)
            .apply(&mut list)
            .expect("task updated");
        assert!(!list.0[0].completed);
        assert!(list.0[1].completed);
    }

    #[rstest]
    fn updating_a_missing_task_is_not_found() {
        let mut list = TodoList::default();
        let error = TodoMutation::SetCompleted(task("Call SSS", "09:00"))
            .apply(&mut list)
            .expect_err("nothing to update");
        assert!(matches!(error, MutationError::NotFound { what: "task", .. }));
    }

    #[rstest]
    fn deletes_remove_only_the_matching_task() {
        let mut list = TodoList(vec![task("Call SSS", "09:00"), task("File 201", "09:00")]);
        TodoMutation::Delete(task("Call SSS", "09:00"))
            .apply(&mut list)
            .expect("task removed");
        TodoMutation::Delete(task("Call SSS", "09:00"))
            .apply(&mut list)
            .expect("repeat delete is harmless");
        assert_eq!(list.0, vec![task("File 201", "09:00")]);
    }
}
