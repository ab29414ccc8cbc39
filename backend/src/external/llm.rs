//! Chat completion client for agronomic advice
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol (OpenRouter by
//! default). The model is treated as a black box: the client sends a prompt
//! and returns whatever text comes back.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use shared::{Language, SoilSample};

/// Shown when advice could not be generated
pub const ANALYSIS_UNAVAILABLE: &str = "AI विश्लेषण अभी उपलब्ध नहीं है। कृपया बाद में पुनः प्रयास करें।";

/// Chat completion client
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Build the advisory prompt for a sample and the current weather
pub fn build_prompt(sample: &SoilSample, weather_summary: &str, language: Language) -> String {
    let sample_block = format!(
        "pH: {}\nNitrogen: {}\nPhosphorus: {}\nPotassium: {}\nOrganic Carbon: {}",
        sample.ph_level,
        sample.nitrogen,
        sample.phosphorus,
        sample.potassium,
        sample.organic_carbon,
    );

    match language {
        Language::Hindi => format!(
            "आप भारतीय कृषि वैज्ञानिक हैं।\n\
             इस मिट्टी रिपोर्ट का विश्लेषण करें:\n{}\n\n\
             मौसम जानकारी:\n{}\n\n\
             सुधार योजना, फसल सुझाव और 6 महीने की योजना दें।\n\
             उत्तर हिंदी में दें।",
            sample_block, weather_summary
        ),
        Language::English => format!(
            "You are an Indian agricultural scientist.\n\
             Analyse this soil report:\n{}\n\n\
             Weather information:\n{}\n\n\
             Give an improvement plan, crop suggestions and a 6-month plan.\n\
             Answer in English.",
            sample_block, weather_summary
        ),
    }
}

impl LlmClient {
    /// Create a new LlmClient from configuration
    pub fn new(config: &LlmConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("LLM HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create a new LlmClient with custom base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a single-turn prompt and return the completion text
    pub async fn complete(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("LLM API key missing".to_string()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("LLM request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "LLM API error: {} - {}",
                status, body
            )));
        }

        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse LLM response: {}", e)))?;

        extract_content(data)
    }
}

fn extract_content(data: ChatCompletionResponse) -> AppResult<String> {
    data.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| AppError::ExternalService("LLM returned an empty completion".to_string()))
}
