//! Kerbside Storage - SQLite persistence layer.
//!
//! Persists the rate set and per-route metrics. `Database` implements the
//! core's `RateStore` contract, so the engine never sees SQLite directly.
//!
//! # Example
//!
//! ```no_run
//! use kerbside_storage::Database;
//! use kerbside_core::{CreateRateInput, RateEngine};
//!
//! let db = Database::in_memory().unwrap();
//! let engine = RateEngine::new(db);
//!
//! engine.create_rate(
//!     &CreateRateInput {
//!         days: "mon".to_string(),
//!         times: "0900-1200".to_string(),
//!         tz: "America/Chicago".to_string(),
//!         price: 1500,
//!     },
//!     true,
//!     true,
//! ).unwrap();
//! ```

mod database;
pub mod error;
pub mod models;
mod pool;
pub mod repository;
mod schema;

pub use database::Database;
pub use error::{Result, StorageError};
pub use models::RouteMetrics;
pub use pool::ConnectionPool;
pub use repository::{MetricsRepo, RatesRepo};
