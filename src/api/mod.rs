//! HTTP API handlers for weighpoint

pub mod auth;
pub mod cors;
pub mod health;
pub mod ingest;
pub mod query;

pub use auth::auth_middleware;
pub use cors::cors_middleware;
pub use health::health_routes;
pub use ingest::{import_weights, submit_weight};
pub use query::list_weights;
