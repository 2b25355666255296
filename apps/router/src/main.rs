mod classify;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Assess Router v{}", env!("CARGO_PKG_VERSION"));

    // Routing table is validated here; a broken table stops startup
    let state = AppState::from_config(config.clone())?;
    let table_source = config
        .routing_table_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "embedded".to_string());
    info!(
        table = %table_source,
        labels = state.classifier.table().labels().len(),
        rules = state.classifier.table().rules().len(),
        "Routing table loaded"
    );
    info!(
        "Destinations under {} (min_score={}, margin={}, strict={})",
        state.classifier.destinations().base_url(),
        config.thresholds.min_score,
        config.thresholds.margin,
        config.debug_on_low_confidence
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
