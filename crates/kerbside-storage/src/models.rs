//! Storage data models.
//!
//! The persisted rate entity itself lives in `kerbside-core` (it is the
//! engine's type); storage only adds the route-metrics record.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health counters for one API route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMetrics {
    pub route_name: String,
    pub hit_count: i64,
    pub success_count: i64,
    pub failure_count: i64,
    /// Incremental average response time in milliseconds.
    pub avg_response_ms: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
