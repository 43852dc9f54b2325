//! Saving the assignment roster together with its history.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::records::{AssignmentHistory, AssignmentRoster};
use super::{Error, RecordBook, Revision};

/// Writes the current roster and appends a stamped copy to the history.
#[derive(Clone)]
pub struct AssignmentService {
    book: RecordBook,
    clock: Arc<dyn Clock>,
}

impl AssignmentService {
    /// Create the service over a record book.
    #[must_use]
    pub fn new(book: RecordBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }

    /// Replace the current roster and record every entry in the history.
    ///
    /// Both documents are locked for the whole sequence, history first.
    ///
    /// # Errors
    /// Storage failures of either document. When the history write fails
    /// the new roster has already been stored.
    pub async fn save_roster(&self, roster: AssignmentRoster) -> Result<Revision, Error> {
        let history_store = self.book.store::<AssignmentHistory>();
        let roster_store = self.book.store::<AssignmentRoster>();
        let history_guard = history_store.lock().await;
        let roster_guard = roster_store.lock().await;

        let at = self.clock.utc().naive_utc();
        let mut history = history_store.load_or_default().await?.document;
        history.record(&roster, at);
        let entries = roster.0.len();

        let revision = roster_store.write_locked(&roster_guard, roster).await?;
        history_store.write_locked(&history_guard, history).await?;
        info!(entries, "assignment roster saved");
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::InMemoryDocumentStore;
    use crate::domain::records::Assignment;
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use rstest::rstest;

    fn clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(
            Utc.with_ymd_and_hms(2024, 4, 2, 9, 15, 0)
                .single()
                .expect("valid timestamp"),
        );
        Arc::new(clock)
    }

    fn roster(projects: &[&str]) -> AssignmentRoster {
        AssignmentRoster(
            projects
                .iter()
                .map(|project| Assignment {
                    lname: "Reyes".to_owned(),
                    project: (*project).to_owned(),
                    ..Assignment::default()
                })
                .collect(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn every_save_appends_to_history() {
        let book = RecordBook::new(Arc::new(InMemoryDocumentStore::new()));
        let service = AssignmentService::new(book.clone(), clock());

        service
            .save_roster(roster(&["Pier 4"]))
            .await
            .expect("first save");
        service
            .save_roster(roster(&["Pier 4", "Mill B"]))
            .await
            .expect("second save");

        let current = book
            .store::<AssignmentRoster>()
            .load()
            .await
            .expect("roster stored");
        assert_eq!(current.document.0.len(), 2);
        let history = book
            .store::<AssignmentHistory>()
            .load()
            .await
            .expect("history stored");
        assert_eq!(history.document.0.len(), 3);
        assert_eq!(history.document.0[2].timestamp, "2024-04-02 09:15:00");
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failures_surface_as_io_errors() {
        let store = InMemoryDocumentStore::new();
        store.fail_writes(Some("empassign.json"));
        let service = AssignmentService::new(RecordBook::new(Arc::new(store)), clock());

        let error = service
            .save_roster(roster(&["Pier 4"]))
            .await
            .expect_err("write fails");
        assert_eq!(error.code(), ErrorCode::IoError);
    }
}
