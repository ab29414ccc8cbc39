//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint by city name.
//! Callers that only need display text use [`WeatherClient::summary_for_city`],
//! which never fails and substitutes a placeholder instead.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Shown when no API key is configured
pub const WEATHER_KEY_MISSING: &str = "मौसम डेटा उपलब्ध नहीं (API key missing)";

/// Shown on any lookup failure
pub const WEATHER_UNAVAILABLE: &str = "मौसम डेटा उपलब्ध नहीं";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentWeather {
    pub temperature_celsius: f64,
    pub weather_description: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Weather HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: non_empty(config.api_key.clone()),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key: non_empty(api_key),
            base_url,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current weather conditions by city name
    pub async fn get_current_weather(&self, city: &str) -> AppResult<CurrentWeather> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Weather API key missing".to_string()))?;

        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        convert_current_response(data)
    }

    /// Human-readable weather line for a report, or a placeholder
    pub async fn summary_for_city(&self, city: &str) -> String {
        if !self.has_api_key() {
            tracing::warn!("weather API key missing, using placeholder");
            return WEATHER_KEY_MISSING.to_string();
        }

        let city = city.trim();
        if city.is_empty() {
            return WEATHER_UNAVAILABLE.to_string();
        }

        match self.get_current_weather(city).await {
            Ok(weather) => format_summary(&weather),
            Err(error) => {
                tracing::warn!(%error, city, "weather lookup failed");
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Convert OpenWeatherMap current response to our format
fn convert_current_response(data: OWMCurrentResponse) -> AppResult<CurrentWeather> {
    let weather = data
        .weather
        .first()
        .ok_or_else(|| AppError::ExternalService("Weather response has no conditions".into()))?;

    Ok(CurrentWeather {
        temperature_celsius: data.main.temp,
        weather_description: weather.description.clone(),
    })
}

/// Format conditions as the report's weather line
pub fn format_summary(weather: &CurrentWeather) -> String {
    format!(
        "तापमान: {}°C, मौसम: {}",
        weather.temperature_celsius, weather.weather_description
    )
}

fn non_empty(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}
