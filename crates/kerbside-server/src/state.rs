//! Application state for the API server.

use std::sync::Arc;

use kerbside_core::RateEngine;
use kerbside_storage::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The rate engine, backed by the database.
    pub engine: Arc<RateEngine<Database>>,
    /// Direct database handle for route-metrics recording.
    pub db: Database,
}

impl AppState {
    /// Creates a new application state with the given database.
    pub fn new(db: Database) -> Self {
        Self {
            engine: Arc::new(RateEngine::new(db.clone())),
            db,
        }
    }

    /// Creates application state with a default in-memory database.
    pub fn in_memory() -> Self {
        Self::new(Database::in_memory().expect("Failed to create in-memory database"))
    }
}
