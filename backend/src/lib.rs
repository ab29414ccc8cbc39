//! Soil Health Advisory Platform - backend library
//!
//! Scores soil samples, gathers weather and LLM advice for farmers and keeps
//! a history of submissions in SQLite.

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use error::AppResult;
use external::{LlmClient, TtsClient, WeatherClient};
use services::{AdviceCache, PdfRenderer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub weather: WeatherClient,
    pub llm: LlmClient,
    pub tts: TtsClient,
    pub advice_cache: AdviceCache,
    pub pdf: PdfRenderer,
}

impl AppState {
    /// Build the shared clients from configuration
    pub fn new(db: SqlitePool, config: Config) -> AppResult<Self> {
        let weather = WeatherClient::new(&config.weather)?;
        let llm = LlmClient::new(&config.llm)?;
        let tts = TtsClient::new(&config.tts)?;
        let advice_cache = AdviceCache::new(Duration::from_secs(config.llm.cache_ttl_secs));

        Ok(Self {
            db,
            config: Arc::new(config),
            weather,
            llm,
            tts,
            advice_cache,
            pdf: PdfRenderer::default(),
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Soil Health Advisory Platform API v1.0"
}

/// Liveness probe
async fn health_check() -> &'static str {
    "OK"
}
