//! Repository layer - typed operations over a borrowed connection.

mod metrics;
mod rates;

pub use metrics::MetricsRepo;
pub use rates::RatesRepo;

use chrono::{DateTime, Utc};

/// Parse a datetime from SQLite format.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}
