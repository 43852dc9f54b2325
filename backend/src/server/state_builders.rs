//! Builders for the HTTP state over the configured data directory.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use recordkeeper::domain::RecordBook;
use recordkeeper::domain::ports::DocumentStoreError;
use recordkeeper::inbound::http::state::HttpState;
use recordkeeper::outbound::persistence::JsonFileStore;

use super::ServerConfig;

/// Open the data directory and wire the services over it.
///
/// # Errors
/// Returns [`DocumentStoreError`] when the data directory cannot be created
/// or opened.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> Result<web::Data<HttpState>, DocumentStoreError> {
    let store = JsonFileStore::open(&config.data_dir)?;
    info!(data_dir = %store.root(), "document store opened");
    Ok(web::Data::new(HttpState::new(
        RecordBook::new(Arc::new(store)),
        Arc::new(DefaultClock),
        config.reports.clone(),
        config.manager_codes.clone(),
    )))
}
