//! Domain primitives, typed records and the edit-sync-aggregate loop.
//!
//! Purpose: hold every collection as a typed document, route edits through
//! typed mutations and compute summaries as pure functions of a collection.
//! Adapters reach storage only through the ports in [`ports`].
//!
//! Public surface:
//! - Error and ErrorCode: API error payload and stable identifier.
//! - RecordBook and RecordStore: typed whole-document storage.
//! - SyncClient: debounced, retrying owner of a live collection.
//! - records: one module per department page.
//! - aggregates: pure summaries with skip diagnostics.

pub mod aggregates;
mod assignment_service;
mod dialog;
mod document;
pub mod error;
mod leave_service;
mod mutation;
pub mod ports;
mod record_store;
pub mod records;
mod report_service;
mod scalar;
mod sync;
mod trace_id;

pub use self::assignment_service::AssignmentService;
pub use self::dialog::{Dialog, DialogError, DialogState, Prompt};
pub use self::document::{CollectionDocument, Revision, Snapshot};
pub use self::error::{DomainError, Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::leave_service::LeaveService;
pub use self::mutation::{EditKind, Mutation, MutationError, Transform};
pub use self::record_store::{RecordBook, RecordStore, RecordStoreError, WriteGuard};
pub use self::report_service::{
    DEFAULT_COST_PER_KM, DestinationSummary, LogisticsCosts, ReportService, ReportSettings,
};
pub use self::scalar::{LooseNumber, parse_date, parse_timestamp};
pub use self::sync::{SyncClient, SyncError, SyncPolicy, SyncStatus};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recordkeeper::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such document"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
