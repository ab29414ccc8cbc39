//! Common types used across the platform

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported languages for advisory text and speech
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "hi", alias = "hindi")]
    Hindi,
    #[serde(rename = "en", alias = "english")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::English => "en",
        }
    }

    /// BCP-47 tag used by speech synthesis providers
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Hindi => "hi-IN",
            Language::English => "en-IN",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hi" | "hindi" | "hi-in" => Ok(Language::Hindi),
            "en" | "english" | "en-in" => Ok(Language::English),
            other => Err(ParseLanguageError(other.to_string())),
        }
    }
}

/// Error returned when a language tag is not supported
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported language: {0}")]
pub struct ParseLanguageError(pub String);

/// Bounded history query
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryLimit {
    pub limit: u32,
}

impl HistoryLimit {
    /// Clamp a requested limit to `max`, falling back to `default` when absent
    pub fn resolve(requested: Option<u32>, default: u32, max: u32) -> Self {
        Self {
            limit: requested.unwrap_or(default).min(max),
        }
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self { limit: 5 }
    }
}
