//! High-level database interface.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;

use kerbside_core::{Rate, RateStore, StoreError};

use crate::error::{Result, StorageError};
use crate::models::RouteMetrics;
use crate::pool::ConnectionPool;
use crate::repository::{MetricsRepo, RatesRepo};

/// High-level database interface for Kerbside.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database in the default app data directory.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_db_path()?)
    }

    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Get the default database path.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "kerbside", "kerbside")
            .ok_or_else(|| StorageError::Config("Could not determine app data directory".into()))?;

        Ok(proj_dirs.data_dir().join("kerbside.db"))
    }

    // === Rates ===

    /// Get all active rates.
    pub fn list_active_rates(&self) -> Result<Vec<Rate>> {
        let conn = self.pool.get()?;
        RatesRepo::get_active(&conn)
    }

    /// Upsert one or more rates by identity.
    pub fn upsert_rates(&self, rates: &[Rate]) -> Result<()> {
        let conn = self.pool.get()?;
        for rate in rates {
            RatesRepo::upsert(&conn, rate)?;
        }
        Ok(())
    }

    /// Delete a rate by identity.
    pub fn delete_rate(&self, uuid: &str) -> Result<()> {
        let conn = self.pool.get()?;
        RatesRepo::delete(&conn, uuid)
    }

    /// Count stored rates.
    pub fn count_rates(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        RatesRepo::count(&conn)
    }

    // === Route metrics ===

    /// Get all route metrics.
    pub fn all_route_metrics(&self) -> Result<Vec<RouteMetrics>> {
        let conn = self.pool.get()?;
        MetricsRepo::get_all(&conn)
    }

    /// Record one observation for a route.
    pub fn record_route(&self, route_name: &str, success: bool, response_ms: i64) -> Result<()> {
        let conn = self.pool.get()?;
        MetricsRepo::record(&conn, route_name, success, response_ms)
    }
}

/// The engine sees the database through its minimal store contract;
/// storage failures cross the boundary as opaque [`StoreError`]s.
impl RateStore for Database {
    fn list_active(&self) -> std::result::Result<Vec<Rate>, StoreError> {
        self.list_active_rates().map_err(StoreError::new)
    }

    fn put_rates(&self, rates: &[Rate]) -> std::result::Result<(), StoreError> {
        self.upsert_rates(rates).map_err(StoreError::new)
    }

    fn delete_rate(&self, uuid: &str) -> std::result::Result<(), StoreError> {
        Database::delete_rate(self, uuid).map_err(StoreError::new)
    }
}
