//! Whole-document endpoints.
//!
//! ```text
//! GET  /api/v1/documents/{name}   Current document, or its empty default
//! POST /api/v1/documents/{name}   Replace the document with the body
//! PUT  /api/v1/documents/{name}   Same as POST
//! ```
//!
//! Responses carry the stored revision as an `ETag`. Writes honour an
//! optional `If-Match` header and answer `409` when it is stale. Bodies over
//! [`MAX_DOCUMENT_BYTES`] are refused with the usual error envelope.

use actix_web::http::header::{self, HeaderMap};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::domain::records::{
    AbsenceBook, AssignmentHistory, AssignmentRoster, DailySheet, DoneRoster, EmployeeDirectory,
    Fleet, Inventory, LeaveLedger, MachiningBoard, OffenseBook, Payroll, QuotaSheet,
    ResignedRoster, ServiceLog, ServiceRequests, TodoList, ToolInventory, TripLog,
    VehicleSchedule, WarehouseLog,
};
use crate::domain::{CollectionDocument, Error, Revision};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Largest accepted document body.
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Acknowledgement returned by successful writes.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// Revision of the stored bytes.
    pub revision: String,
}

/// `ETag` header tuple for a revision.
#[must_use]
pub fn etag(revision: &Revision) -> (header::HeaderName, String) {
    (header::ETAG, format!("\"{revision}\""))
}

/// Revision from an `If-Match` header. `*` and an absent header both mean
/// "any revision".
#[must_use]
pub fn if_match(headers: &HeaderMap) -> Option<Revision> {
    let raw = headers.get(header::IF_MATCH)?.to_str().ok()?.trim();
    (raw != "*" && !raw.is_empty()).then(|| Revision::parse(raw))
}

/// Acknowledge a stored revision.
#[must_use]
pub fn saved(revision: &Revision) -> HttpResponse {
    HttpResponse::Ok().insert_header(etag(revision)).json(SaveResponse {
        status: "ok",
        revision: revision.to_string(),
    })
}

async fn read_document<D: CollectionDocument>(
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let snapshot = state.book.store::<D>().load_or_default().await?;
    Ok(HttpResponse::Ok()
        .insert_header(etag(&snapshot.revision))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(&snapshot.document))
}

async fn write_document<D: CollectionDocument>(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let body =
        body.map_err(|error| Error::bad_request(format!("document body rejected: {error}")))?;
    let expected = if_match(req.headers());
    let revision = state
        .book
        .store::<D>()
        .replace_raw(&body, expected.as_ref())
        .await?;
    Ok(saved(&revision))
}

async fn unknown_document(path: web::Path<String>) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("unknown document: {}", path.into_inner())))
}

fn register<D: CollectionDocument>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("/documents/{}", D::NAME))
            .route(web::get().to(read_document::<D>))
            .route(web::post().to(write_document::<D>))
            .route(web::put().to(write_document::<D>)),
    );
}

/// Mount every document route, plus a JSON 404 for unknown names.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_DOCUMENT_BYTES));
    register::<TripLog>(cfg);
    register::<ServiceLog>(cfg);
    register::<Fleet>(cfg);
    register::<ToolInventory>(cfg);
    register::<QuotaSheet>(cfg);
    register::<DoneRoster>(cfg);
    register::<AbsenceBook>(cfg);
    register::<LeaveLedger>(cfg);
    register::<EmployeeDirectory>(cfg);
    register::<AssignmentRoster>(cfg);
    register::<AssignmentHistory>(cfg);
    register::<Inventory>(cfg);
    register::<WarehouseLog>(cfg);
    register::<VehicleSchedule>(cfg);
    register::<ServiceRequests>(cfg);
    register::<MachiningBoard>(cfg);
    register::<DailySheet>(cfg);
    register::<Payroll>(cfg);
    register::<TodoList>(cfg);
    register::<OffenseBook>(cfg);
    register::<ResignedRoster>(cfg);
    cfg.route("/documents/{name}", web::route().to(unknown_document));
}
