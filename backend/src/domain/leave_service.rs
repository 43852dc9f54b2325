//! Keeping the leave ledger in step with the employee directory.

use std::sync::Arc;

use chrono::Datelike;
use mockable::Clock;
use tracing::info;

use super::records::{EmployeeDirectory, LeaveLedger, LeaveMutation};
use super::{Error, Mutation, RecordBook, Snapshot};

/// Enrols tenured employees and drops stale leave dates.
#[derive(Clone)]
pub struct LeaveService {
    book: RecordBook,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    /// Create the service over a record book.
    #[must_use]
    pub fn new(book: RecordBook, clock: Arc<dyn Clock>) -> Self {
        Self { book, clock }
    }

    /// Enrol every employee with a year of tenure, purge dates outside the
    /// current year and store the refreshed ledger.
    ///
    /// # Errors
    /// Malformed documents and storage failures.
    pub async fn refresh(&self) -> Result<Snapshot<LeaveLedger>, Error> {
        let today = self.clock.utc().date_naive();
        let employees = self
            .book
            .store::<EmployeeDirectory>()
            .load_or_default()
            .await?
            .document;
        let store = self.book.store::<LeaveLedger>();
        let (document, revision) = store
            .update(|ledger| {
                LeaveMutation::Enroll {
                    employees: employees.0,
                    today,
                }
                .apply(ledger)?;
                for credit in &mut ledger.0 {
                    credit.recalculate(today.year());
                }
                Ok(ledger.clone())
            })
            .await?;
        info!(records = document.0.len(), "leave ledger refreshed");
        Ok(Snapshot { document, revision })
    }
}
