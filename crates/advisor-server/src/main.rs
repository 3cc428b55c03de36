//! Sustainable Crypto Advisor HTTP Server
//!
//! Axum-based dashboard controller: market data, analysis, sustainability
//! scores and rule-based recommendations as JSON endpoints.

mod config;
mod handlers;
mod routes;
mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let source = state.advisor.source();
    if source.health_check().await {
        tracing::info!("✓ Connected to {}", source.name());
    } else {
        tracing::warn!("⚠ {} not reachable - answers will report data unavailable", source.name());
    }

    if state.fetcher.is_some() {
        tracing::info!(
            "  Throttle: {} ms between requests, default TTL {} s",
            config.fetcher.min_interval.as_millis(),
            config.fetcher.default_ttl.as_secs()
        );
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!("🌱 Sustainable Crypto Advisor listening on http://{}", config.bind_addr);
    tracing::info!("  Health:  GET  /health");
    tracing::info!("  Analyze: GET  /api/coins/{{coin}}/analysis");
    tracing::info!("  Advice:  POST /api/advice");

    axum::serve(listener, app).await?;

    Ok(())
}
