//! Soil Health Advisory Platform - Backend Server
//!
//! Soil testing advisory service for farmers: health scores, fertilizer
//! advice, weather-aware AI analysis and spoken reports.

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use soil_advisor::{create_app, db, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired advice entries are dropped from the cache
const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "soil_advisor=debug,tower_http=debug,sqlx=warn".into());
    let (json_layer, pretty_layer) = if config.is_json_logging() {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    tracing::info!("Starting Soil Health Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool and apply migrations
    tracing::info!("Connecting to database...");
    let db_pool = db::connect(&config.database).await?;
    tracing::info!("Database connection established");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;

    // Create application state
    let state = AppState::new(db_pool.clone(), config)?;

    if !state.weather.has_api_key() {
        tracing::warn!("Weather API key not configured, weather will be unavailable");
    }
    if !state.llm.has_api_key() {
        tracing::warn!("LLM API key not configured, AI analysis will be unavailable");
    }
    if !state.tts.has_api_key() {
        tracing::warn!("TTS API key not configured, audio reports are disabled");
    }

    let cache = state.advice_cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = cache.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired advice entries removed");
            }
        }
    });

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
