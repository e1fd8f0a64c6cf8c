//! Kerbside Server - HTTP API server.
//!
//! This crate provides the HTTP API for the Kerbside rate service.
//!
//! ## Endpoints
//!
//! - `GET /heartbeat` - Liveness probe
//! - `GET /api/v1/rates` - Get all active rates
//! - `POST /api/v1/rates/create` - Create a single rate
//! - `POST /api/v1/rates/update/all` - Replace the whole rate set
//! - `POST /api/v1/park` - Price a parking stay for a time range
//! - `GET /api/v1/metrics` - Get per-route health metrics
//!
//! ## Example
//!
//! ```no_run
//! use kerbside_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod handlers;
pub mod models;
pub mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use kerbside_storage::Database;

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 8554;

/// Default server host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 8554).
    pub port: u16,
    /// Database path (None = in-memory).
    pub db_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
        }
    }
}

impl ServerConfig {
    /// Creates a config for in-memory testing.
    pub fn in_memory() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: None,
        }
    }

    /// Creates a config with a specific database path.
    pub fn with_db_path(path: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: Some(path.into()),
        }
    }

    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] kerbside_storage::StorageError),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let db = if let Some(ref path) = config.db_path {
            Database::with_path(path)?
        } else {
            Database::in_memory()?
        };

        Self::with_database(config, db)
    }

    /// Creates a server with an existing database.
    pub fn with_database(
        config: ServerConfig,
        db: Database,
    ) -> std::result::Result<Self, ServerError> {
        let state = AppState::new(db);
        Self::with_state(config, state)
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = build_router(state).layer(cors);

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self { router, addr })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting Kerbside API server on {}", self.addr);

        // SO_REUSEADDR so a restart can bind past lingering TIME_WAIT sockets
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Non-blocking for tokio
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/heartbeat", get(handlers::heartbeat))
        .route("/api/v1/rates", get(handlers::get_rates))
        .route("/api/v1/rates/create", post(handlers::create_rate))
        .route("/api/v1/rates/update/all", post(handlers::overwrite_rates))
        .route("/api/v1/park", post(handlers::park))
        .route("/api/v1/metrics", get(handlers::get_metrics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn create_test_app() -> (Router, AppState) {
        let state = AppState::in_memory();
        (build_router(state.clone()), state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn weekday_rate() -> serde_json::Value {
        json!({
            "days": "mon,tues,thurs",
            "times": "0900-2100",
            "tz": "America/Chicago",
            "price": 1500
        })
    }

    #[tokio::test]
    async fn test_heartbeat() {
        let (app, _) = create_test_app();

        let response = app.oneshot(get_req("/heartbeat")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_get_rates_empty() {
        let (app, _) = create_test_app();

        let response = app.oneshot(get_req("/api/v1/rates")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["rates"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rate_mints_uuid() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json("/api/v1/rates/create", weekday_rate()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(!json["rate"]["UUID"].as_str().unwrap().is_empty());
        assert_eq!(json["rate"]["days"], "mon,tues,thurs");
        assert_eq!(json["rate"]["price"], 1500);
    }

    #[tokio::test]
    async fn test_create_overlapping_rate_conflicts() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/rates/create", weekday_rate()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(post_json(
                "/api/v1/rates/create",
                json!({
                    "days": "mon",
                    "times": "1000-1400",
                    "tz": "America/Chicago",
                    "price": 2000
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["code"], "overlap");
    }

    #[tokio::test]
    async fn test_create_invalid_rate_rejected() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/rates/create",
                json!({
                    "days": "mon",
                    "times": "0900-2100",
                    "tz": "NotAZone",
                    "price": 1500
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_park_matched_range() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/rates/create", weekday_rate()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Monday 2017-01-02, inside 0900-2100 Chicago.
        let response = app
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "2017-01-02T10:00:00-06:00",
                    "end": "2017-01-02T12:00:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["price"], "1500");
    }

    #[tokio::test]
    async fn test_park_unmatched_range_is_unavailable() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/rates/create", weekday_rate()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Before the window opens.
        let response = app
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "2017-01-02T07:00:00-06:00",
                    "end": "2017-01-02T07:30:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["price"], "unavailable");
    }

    #[tokio::test]
    async fn test_park_spanning_days_is_bad_request() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "2017-01-02T23:00:00-06:00",
                    "end": "2017-01-03T01:00:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "bad_range");
    }

    #[tokio::test]
    async fn test_park_unparseable_timestamp_is_bad_request() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "not a timestamp",
                    "end": "2017-01-02T12:00:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_park_ambiguous_match_conflicts() {
        let (app, state) = create_test_app();

        // Two rates covering the same Monday window, written with the
        // overlap check disabled.
        for price in [1500, 2000] {
            state
                .engine
                .create_rate(
                    &kerbside_core::CreateRateInput {
                        days: "mon".to_string(),
                        times: "0900-2100".to_string(),
                        tz: "America/Chicago".to_string(),
                        price,
                    },
                    false,
                    true,
                )
                .unwrap();
        }

        let response = app
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "2017-01-02T10:00:00-06:00",
                    "end": "2017-01-02T12:00:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["code"], "ambiguous_match");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_rate_set() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/rates/create", weekday_rate()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/rates/update/all",
                json!({
                    "rates": [
                        {
                            "days": "wed",
                            "times": "0600-1800",
                            "tz": "America/Chicago",
                            "price": 1750
                        },
                        {
                            "days": "fri,sat,sun",
                            "times": "0900-2100",
                            "tz": "America/Chicago",
                            "price": 2000
                        }
                    ]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["rates"].as_array().unwrap().len(), 2);

        let response = app.oneshot(get_req("/api/v1/rates")).await.unwrap();
        let json = body_json(response).await;
        let rates = json["rates"].as_array().unwrap();
        assert_eq!(rates.len(), 2);
        assert!(rates.iter().all(|r| r["days"] != "mon,tues,thurs"));
    }

    #[tokio::test]
    async fn test_overwrite_empty_batch_is_bad_request() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(post_json("/api/v1/rates/update/all", json!({ "rates": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_populated_after_requests() {
        let (app, _) = create_test_app();

        let response = app.clone().oneshot(get_req("/api/v1/rates")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_req("/api/v1/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let metrics = json["metrics"].as_array().unwrap();
        let rates_route = metrics
            .iter()
            .find(|m| m["route_name"] == "GetRatesRoute")
            .unwrap();
        assert_eq!(rates_route["hit_count"], 1);
        assert_eq!(rates_route["success_count"], 1);
        assert_eq!(rates_route["failure_count"], 0);
    }

    #[tokio::test]
    async fn test_metrics_counts_failures() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/park",
                json!({
                    "start": "2017-01-02T12:00:00-06:00",
                    "end": "2017-01-02T10:00:00-06:00"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get_req("/api/v1/metrics")).await.unwrap();
        let json = body_json(response).await;
        let park_route = json["metrics"]
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["route_name"] == "GetTimespanPriceRoute")
            .cloned()
            .unwrap();
        assert_eq!(park_route["hit_count"], 1);
        assert_eq!(park_route["failure_count"], 1);
    }

    #[tokio::test]
    async fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.db_path.is_none());
    }

    #[tokio::test]
    async fn test_server_config_with_port() {
        let config = ServerConfig::default().with_port(9000);
        assert_eq!(config.port, 9000);
    }
}
