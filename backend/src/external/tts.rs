//! Text-to-speech client (Sarvam AI)
//!
//! Synthesis is optional: missing credentials or a provider failure yield
//! `None` and the report is delivered without audio.

use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::TtsConfig;
use crate::error::{AppError, AppResult};

/// Speech synthesis client
#[derive(Clone)]
pub struct TtsClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    speaker: String,
    language_code: String,
    max_chars: usize,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    target_language_code: &'a str,
    model: &'a str,
    speaker: &'a str,
}

#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    audios: Vec<String>,
}

/// Cut text to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

impl TtsClient {
    /// Create a new TtsClient from configuration
    pub fn new(config: &TtsConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("TTS HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            speaker: config.speaker.clone(),
            language_code: config.language_code.clone(),
            max_chars: config.max_chars,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Synthesize speech, returning the decoded audio bytes
    pub async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("TTS API key missing".to_string()))?;

        let request = SynthesisRequest {
            text: truncate_chars(text, self.max_chars),
            target_language_code: &self.language_code,
            model: &self.model,
            speaker: &self.speaker,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-subscription-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("TTS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "TTS API error: {} - {}",
                status, body
            )));
        }

        let data: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse TTS response: {}", e)))?;

        decode_first_audio(data)
    }

    /// Synthesize speech, or `None` when unavailable
    pub async fn try_synthesize(&self, text: &str) -> Option<Vec<u8>> {
        if !self.has_api_key() {
            tracing::warn!("TTS API key missing, skipping audio");
            return None;
        }

        match self.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(error) => {
                tracing::warn!(%error, "speech synthesis failed");
                None
            }
        }
    }
}

fn decode_first_audio(data: SynthesisResponse) -> AppResult<Vec<u8>> {
    let encoded = data
        .audios
        .first()
        .ok_or_else(|| AppError::ExternalService("TTS response has no audio".to_string()))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AppError::ExternalService(format!("Invalid TTS audio encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "मिट्टी";
        assert_eq!(truncate_chars(text, 100), text);
        let cut = truncate_chars(text, 2);
        assert_eq!(cut.chars().count(), 2);
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_decode_first_audio() {
        let data = SynthesisResponse {
            audios: vec!["UklGRg==".to_string()],
        };
        assert_eq!(decode_first_audio(data).unwrap(), b"RIFF".to_vec());

        let empty = SynthesisResponse { audios: vec![] };
        assert!(decode_first_audio(empty).is_err());
    }
}
