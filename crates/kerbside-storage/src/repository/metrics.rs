//! Route metrics repository.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::RouteMetrics;
use crate::repository::parse_datetime;

/// Repository for per-route health counters.
pub struct MetricsRepo;

impl MetricsRepo {
    /// Get all route metrics.
    pub fn get_all(conn: &Connection) -> Result<Vec<RouteMetrics>> {
        let mut stmt = conn.prepare(
            "SELECT route_name, hit_count, success_count, failure_count,
                    avg_response_ms, created_at, last_updated
             FROM route_metrics ORDER BY route_name ASC",
        )?;

        let metrics = stmt
            .query_map([], |row| {
                Ok(RouteMetrics {
                    route_name: row.get(0)?,
                    hit_count: row.get(1)?,
                    success_count: row.get(2)?,
                    failure_count: row.get(3)?,
                    avg_response_ms: row.get(4)?,
                    created_at: parse_datetime(&row.get::<_, String>(5)?),
                    last_updated: parse_datetime(&row.get::<_, String>(6)?),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(metrics)
    }

    /// Record one observation for a route: bumps the hit count, the
    /// success or failure count, and folds the sample into the running
    /// average as `avg += (sample - avg) / hits`.
    pub fn record(
        conn: &Connection,
        route_name: &str,
        success: bool,
        response_ms: i64,
    ) -> Result<()> {
        let existing: Option<(i64, i64)> = conn
            .query_row(
                "SELECT hit_count, avg_response_ms FROM route_metrics WHERE route_name = ?1",
                [route_name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((hits, avg)) => {
                let hits = hits + 1;
                let avg = avg + (response_ms - avg) / hits;
                conn.execute(
                    "UPDATE route_metrics SET
                         hit_count = ?2,
                         success_count = success_count + ?3,
                         failure_count = failure_count + ?4,
                         avg_response_ms = ?5,
                         last_updated = datetime('now')
                     WHERE route_name = ?1",
                    params![route_name, hits, success as i64, (!success) as i64, avg],
                )?;
            }
            None => {
                conn.execute(
                    "INSERT INTO route_metrics
                         (route_name, hit_count, success_count, failure_count, avg_response_ms)
                     VALUES (?1, 1, ?2, ?3, ?4)",
                    params![route_name, success as i64, (!success) as i64, response_ms],
                )?;
            }
        }

        Ok(())
    }
}
