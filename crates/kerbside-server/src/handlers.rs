//! API route handlers.
//!
//! Every handler records a route-metrics observation on the way out;
//! a failure to record is logged and never surfaced to the client.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use chrono::DateTime;
use tracing::{info, warn};

use kerbside_core::{EngineError, MatchError};

use crate::error::{ApiError, Result};
use crate::models::{
    CreateRateRequest, CreateRateResponse, MetricsResponse, OverwriteRatesRequest,
    OverwriteRatesResponse, ParkRequest, ParkResponse, RatesResponse,
};
use crate::state::AppState;

pub const GET_RATES_ROUTE: &str = "GetRatesRoute";
pub const CREATE_RATE_ROUTE: &str = "CreateRateRoute";
pub const OVERWRITE_RATES_ROUTE: &str = "OverwriteRatesRoute";
pub const GET_TIMESPAN_PRICE_ROUTE: &str = "GetTimespanPriceRoute";
pub const GET_ALL_ROUTE_METRICS_ROUTE: &str = "GetAllRouteMetricsRoute";

/// Records one observation for a route, fire-and-forget.
fn record(state: &AppState, route_name: &str, success: bool, started: Instant) {
    let response_ms = started.elapsed().as_millis() as i64;
    if let Err(err) = state.db.record_route(route_name, success, response_ms) {
        warn!(route_name, %err, "failed to record route metrics");
    }
}

/// GET /heartbeat - liveness probe.
pub async fn heartbeat() -> &'static str {
    "OK"
}

/// GET /api/v1/rates - all active rates.
pub async fn get_rates(State(state): State<AppState>) -> Result<Json<RatesResponse>> {
    let started = Instant::now();

    match state.engine.list_rates() {
        Ok(rates) => {
            info!(count = rates.len(), "listed rates");
            record(&state, GET_RATES_ROUTE, true, started);
            Ok(Json(RatesResponse { rates }))
        }
        Err(err) => {
            record(&state, GET_RATES_ROUTE, false, started);
            Err(err.into())
        }
    }
}

/// POST /api/v1/rates/create - create one rate (overlap-checked, persisted).
pub async fn create_rate(
    State(state): State<AppState>,
    Json(req): Json<CreateRateRequest>,
) -> Result<Json<CreateRateResponse>> {
    let started = Instant::now();

    match state.engine.create_rate(&req.into(), true, true) {
        Ok(rate) => {
            info!(uuid = %rate.uuid, "created rate");
            record(&state, CREATE_RATE_ROUTE, true, started);
            Ok(Json(CreateRateResponse { rate }))
        }
        Err(err) => {
            record(&state, CREATE_RATE_ROUTE, false, started);
            Err(err.into())
        }
    }
}

/// POST /api/v1/rates/update/all - replace the whole rate set.
pub async fn overwrite_rates(
    State(state): State<AppState>,
    Json(req): Json<OverwriteRatesRequest>,
) -> Result<Json<OverwriteRatesResponse>> {
    let started = Instant::now();

    let inputs: Vec<_> = req.rates.into_iter().map(Into::into).collect();
    match state.engine.replace_all_rates(&inputs) {
        Ok(rates) => {
            info!(count = rates.len(), "overwrote rate set");
            record(&state, OVERWRITE_RATES_ROUTE, true, started);
            Ok(Json(OverwriteRatesResponse { rates }))
        }
        Err(err) => {
            record(&state, OVERWRITE_RATES_ROUTE, false, started);
            Err(err.into())
        }
    }
}

/// POST /api/v1/park - price a parking stay.
///
/// An unmatched range is not a failure: it answers 200 with the literal
/// price `"unavailable"`. Everything else propagates as an error.
pub async fn park(
    State(state): State<AppState>,
    Json(req): Json<ParkRequest>,
) -> Result<Json<ParkResponse>> {
    let started = Instant::now();

    let outcome = parse_park_request(&req).and_then(|(start, end)| {
        match state.engine.price_for_range(start, end) {
            Ok(price) => Ok(price.to_string()),
            Err(EngineError::Match(MatchError::Unavailable)) => Ok("unavailable".to_string()),
            Err(err) => Err(err.into()),
        }
    });

    match outcome {
        Ok(price) => {
            info!(price = %price, start = %req.start, end = %req.end, "priced range");
            record(&state, GET_TIMESPAN_PRICE_ROUTE, true, started);
            Ok(Json(ParkResponse { price }))
        }
        Err(err) => {
            record(&state, GET_TIMESPAN_PRICE_ROUTE, false, started);
            Err(err)
        }
    }
}

fn parse_park_request(
    req: &ParkRequest,
) -> std::result::Result<
    (
        chrono::DateTime<chrono::FixedOffset>,
        chrono::DateTime<chrono::FixedOffset>,
    ),
    ApiError,
> {
    let start = DateTime::parse_from_rfc3339(&req.start)
        .map_err(|e| ApiError::BadRequest(format!("start time parsing error: {e}")))?;
    let end = DateTime::parse_from_rfc3339(&req.end)
        .map_err(|e| ApiError::BadRequest(format!("end time parsing error: {e}")))?;
    Ok((start, end))
}

/// GET /api/v1/metrics - per-route health counters.
pub async fn get_metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>> {
    let started = Instant::now();

    match state.db.all_route_metrics() {
        Ok(metrics) => {
            record(&state, GET_ALL_ROUTE_METRICS_ROUTE, true, started);
            Ok(Json(MetricsResponse { metrics }))
        }
        Err(err) => {
            record(&state, GET_ALL_ROUTE_METRICS_ROUTE, false, started);
            Err(ApiError::Internal(err.to_string()))
        }
    }
}
