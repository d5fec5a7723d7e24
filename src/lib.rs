//! weighpoint library - idempotent body-weight ingestion service
//!
//! Ingests body-weight samples over HTTP, normalizes them to kilograms, and
//! stores them idempotently keyed by a client-supplied identifier. A read
//! endpoint returns the recent series in both kilograms and derived pounds.

use axum::{middleware, routing::post, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod sample;
pub mod units;

pub use config::Config;
pub use error::{Error, Result};

/// Application state shared across HTTP handlers
///
/// All mutable state lives in the database; this struct is cheap to clone and
/// never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved service configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build application router
///
/// API routes sit under `/api` behind the bearer-token middleware (a no-op
/// when no token is configured; GETs pass unless reads are protected).
/// `/health` stays outside the API prefix and is never authenticated. CORS
/// is the outermost layer so even rejected requests carry its headers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/health/weight",
            post(api::submit_weight).get(api::list_weights),
        )
        .route("/health/import", post(api::import_weights))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .nest("/api", api_routes)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::cors_middleware,
        ))
        .with_state(state)
}
