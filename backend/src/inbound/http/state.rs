//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`. Everything in it
//! is cheap to clone and shares the one record book.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::records::ManagerCodes;
use crate::domain::{AssignmentService, LeaveService, RecordBook, ReportService, ReportSettings};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Typed document stores.
    pub book: RecordBook,
    /// Source of "today" for stamped records.
    pub clock: Arc<dyn Clock>,
    /// Read-only reports.
    pub reports: ReportService,
    /// Roster plus history writes.
    pub assignments: AssignmentService,
    /// Leave ledger upkeep.
    pub leave: LeaveService,
    /// Codes accepted on absence requests.
    pub manager_codes: ManagerCodes,
}

impl HttpState {
    /// Wire the services over one record book.
    #[must_use]
    pub fn new(
        book: RecordBook,
        clock: Arc<dyn Clock>,
        settings: ReportSettings,
        manager_codes: ManagerCodes,
    ) -> Self {
        Self {
            reports: ReportService::new(book.clone(), settings),
            assignments: AssignmentService::new(book.clone(), Arc::clone(&clock)),
            leave: LeaveService::new(book.clone(), Arc::clone(&clock)),
            book,
            clock,
            manager_codes,
        }
    }
}
