//! HTTP inbound adapter exposing the record endpoints.

pub mod documents;
pub mod error;
pub mod health;
pub mod records;
pub mod reports;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Mount the document, record and report routes under [`API_PREFIX`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use recordkeeper::inbound::http::api;
///
/// let _app = App::new().configure(api);
/// ```
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .configure(documents::configure)
            .configure(records::configure)
            .configure(reports::configure),
    );
}
