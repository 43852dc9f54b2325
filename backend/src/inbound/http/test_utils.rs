//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{TimeZone, Utc};
use mockable::{Clock, MockClock};

use super::api;
use super::state::HttpState;
use crate::domain::ports::InMemoryDocumentStore;
use crate::domain::records::ManagerCodes;
use crate::domain::{RecordBook, ReportSettings};

/// Clock pinned to 2024-06-03 09:00 UTC.
pub fn fixed_clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp"),
    );
    Arc::new(clock)
}

/// State over `store` with default report settings and manager codes.
pub fn state_over(store: Arc<InMemoryDocumentStore>) -> HttpState {
    HttpState::new(
        RecordBook::new(store),
        fixed_clock(),
        ReportSettings::default(),
        ManagerCodes::default(),
    )
}

/// Application serving the API over `store`.
pub fn test_app(
    store: Arc<InMemoryDocumentStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state_over(store)))
        .configure(api)
}
