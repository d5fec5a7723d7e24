//! weighpoint - body-weight ingestion service
//!
//! Accepts weight samples from health-tracking clients, normalizes them to
//! kilograms, and stores them idempotently in SQLite.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use weighpoint::config::{Args, Config};
use weighpoint::{build_router, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting weighpoint v{} [{}] ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );

    let config = Config::load(Args::parse())?;
    info!("Database path: {}", config.database_path.display());
    if config.api_token.is_some() {
        info!(
            "Bearer auth enabled for writes{}",
            if config.protect_reads { " and reads" } else { "" }
        );
    } else {
        info!("Bearer auth disabled (no token configured)");
    }
    if config.allowed_origins.is_empty() {
        info!("CORS: all origins allowed");
    } else {
        info!("CORS allow-list: {}", config.allowed_origins.join(", "));
    }

    let pool = db::init_database(&config.database_path).await?;

    let addr = config.listen_addr();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("weighpoint listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
