//! Read-only report endpoints.
//!
//! ```text
//! GET /api/v1/reports/logistics/costs
//! GET /api/v1/reports/logistics/destinations
//! GET /api/v1/reports/logistics/fuel?vehicle=&year=&month=
//! GET /api/v1/reports/quota/callouts?date=YYYY-MM-DD
//! GET /api/v1/reports/inventory
//! GET /api/v1/reports/quota/machines?year=&month=&day=
//! GET /api/v1/reports/machining/daily
//! GET /api/v1/reports/warehouse?department=&item=&requestedBy=&type=&year=&month=&day=
//! ```
//!
//! Every report carries `diagnostics {considered, skipped}` so callers can
//! see how many rows were left out of the arithmetic.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::aggregates::{
    CalloutReport, DateFilter, DepartmentTotals, InventoryReport, MachineReport, Total,
    WarehouseFilter, WeekTotals,
};
use crate::domain::records::LogFilter;
use crate::domain::{DestinationSummary, Error, LogisticsCosts, parse_date};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query of the callout report.
#[derive(Debug, Deserialize)]
pub struct CalloutQuery {
    /// Shift date, `YYYY-MM-DD`.
    pub date: String,
}

/// Per-vehicle odometer deltas priced at the configured rate.
#[get("/reports/logistics/costs")]
pub async fn logistics_costs(state: web::Data<HttpState>) -> ApiResult<web::Json<LogisticsCosts>> {
    Ok(web::Json(state.reports.logistics_costs().await?))
}

/// Trips per destination bucket and per month.
#[get("/reports/logistics/destinations")]
pub async fn destinations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DestinationSummary>> {
    Ok(web::Json(state.reports.destinations().await?))
}

/// Fuel spend over the filtered service log.
#[get("/reports/logistics/fuel")]
pub async fn fuel_total(
    state: web::Data<HttpState>,
    filter: web::Query<LogFilter>,
) -> ApiResult<web::Json<Total>> {
    Ok(web::Json(state.reports.fuel_total(&filter).await?))
}

/// Operators under quota on `date` who were not yet called out.
#[get("/reports/quota/callouts")]
pub async fn quota_callouts(
    state: web::Data<HttpState>,
    query: web::Query<CalloutQuery>,
) -> ApiResult<web::Json<CalloutReport>> {
    if parse_date(&query.date).is_none() {
        return Err(Error::bad_request(format!(
            "date must be YYYY-MM-DD: {}",
            query.date
        )));
    }
    Ok(web::Json(state.reports.quota_callouts(&query.date).await?))
}

/// Stock levels reconciled from the warehouse log.
#[get("/reports/inventory")]
pub async fn inventory(state: web::Data<HttpState>) -> ApiResult<web::Json<InventoryReport>> {
    Ok(web::Json(state.reports.inventory().await?))
}

/// Runs and output per machine across both shifts.
#[get("/reports/quota/machines")]
pub async fn machine_usage(
    state: web::Data<HttpState>,
    filter: web::Query<DateFilter>,
) -> ApiResult<web::Json<MachineReport>> {
    Ok(web::Json(state.reports.machine_usage(&filter).await?))
}

/// Per-day output and delivery totals of the weekly sheets.
#[get("/reports/machining/daily")]
pub async fn daily_totals(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<WeekTotals>>> {
    Ok(web::Json(state.reports.daily_totals().await?))
}

/// Filtered warehouse movements with amount, quantity and requester totals.
#[get("/reports/warehouse")]
pub async fn warehouse_totals(
    state: web::Data<HttpState>,
    filter: web::Query<WarehouseFilter>,
) -> ApiResult<web::Json<DepartmentTotals>> {
    Ok(web::Json(state.reports.warehouse_totals(&filter).await?))
}

/// Mount the report endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(logistics_costs)
        .service(destinations)
        .service(fuel_total)
        .service(quota_callouts)
        .service(inventory)
        .service(machine_usage)
        .service(daily_totals)
        .service(warehouse_totals);
}
