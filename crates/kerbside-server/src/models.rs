//! API request and response models.

use serde::{Deserialize, Serialize};

use kerbside_core::{CreateRateInput, Rate};
use kerbside_storage::RouteMetrics;

/// Request body for POST /api/v1/rates/create.
#[derive(Debug, Deserialize)]
pub struct CreateRateRequest {
    pub days: String,
    pub times: String,
    pub tz: String,
    pub price: i64,
}

impl From<CreateRateRequest> for CreateRateInput {
    fn from(req: CreateRateRequest) -> Self {
        CreateRateInput {
            days: req.days,
            times: req.times,
            tz: req.tz,
            price: req.price,
        }
    }
}

/// Response body for POST /api/v1/rates/create.
#[derive(Debug, Serialize)]
pub struct CreateRateResponse {
    pub rate: Rate,
}

/// Response body for GET /api/v1/rates.
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub rates: Vec<Rate>,
}

/// Request body for POST /api/v1/rates/update/all.
#[derive(Debug, Deserialize)]
pub struct OverwriteRatesRequest {
    pub rates: Vec<CreateRateRequest>,
}

/// Response body for POST /api/v1/rates/update/all.
#[derive(Debug, Serialize)]
pub struct OverwriteRatesResponse {
    pub rates: Vec<Rate>,
}

/// Request body for POST /api/v1/park. Timestamps are RFC 3339 with an
/// explicit UTC offset.
#[derive(Debug, Deserialize)]
pub struct ParkRequest {
    pub start: String,
    pub end: String,
}

/// Response body for POST /api/v1/park. `price` is the matched rate's
/// price, or the literal `"unavailable"` when no rate covers the range.
#[derive(Debug, Serialize)]
pub struct ParkResponse {
    pub price: String,
}

/// Response body for GET /api/v1/metrics.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<RouteMetrics>,
}
