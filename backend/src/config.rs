//! Configuration management for the Soil Health Advisory Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SOIL_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// LLM completion API configuration
    pub llm: LlmConfig,

    /// Speech synthesis configuration
    pub tts: TtsConfig,

    /// Report history configuration
    pub history: HistoryConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key (OpenWeatherMap)
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,

    /// API key for the completion provider
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How long an identical prompt reuses a previous answer
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TtsConfig {
    /// Text-to-speech endpoint
    pub endpoint: String,

    /// API subscription key
    pub api_key: Option<String>,

    /// Voice model
    pub model: String,

    /// Speaker voice
    pub speaker: String,

    /// Target language code (e.g. hi-IN)
    pub language_code: String,

    /// Provider character ceiling; longer text is truncated
    pub max_chars: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Number of reports returned when no limit is given
    pub default_limit: u32,

    /// Largest limit a caller may request
    pub max_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// "pretty" or "json"
    pub format: String,
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn with_defaults(environment: &str) -> Result<Builder, ConfigError> {
    config::Config::builder()
        .set_default("environment", environment)?
        .set_default("server.port", 3000)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("database.url", "sqlite://soil_reports.db?mode=rwc")?
        .set_default("database.max_connections", 5)?
        .set_default("database.min_connections", 1)?
        .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
        .set_default("weather.timeout_secs", 10)?
        .set_default("llm.base_url", "https://openrouter.ai/api/v1")?
        .set_default("llm.model", "openrouter/free")?
        .set_default("llm.timeout_secs", 120)?
        .set_default("llm.cache_ttl_secs", 3600)?
        .set_default("tts.endpoint", "https://api.sarvam.ai/text-to-speech")?
        .set_default("tts.model", "bulbul:v3")?
        .set_default("tts.speaker", "shubh")?
        .set_default("tts.language_code", "hi-IN")?
        .set_default("tts.max_chars", 2500)?
        .set_default("tts.timeout_secs", 60)?
        .set_default("history.default_limit", 5)?
        .set_default("history.max_limit", 100)?
        .set_default("logging.format", "pretty")
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SOIL_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = with_defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SOIL_ prefix)
            .add_source(
                Environment::with_prefix("SOIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Built-in defaults only, ignoring files and the environment.
    /// No API keys are set, so every external collaborator runs offline.
    pub fn defaults() -> Result<Self, ConfigError> {
        with_defaults("test")?.build()?.try_deserialize()
    }

    pub fn is_json_logging(&self) -> bool {
        self.logging.format.eq_ignore_ascii_case("json")
    }
}
