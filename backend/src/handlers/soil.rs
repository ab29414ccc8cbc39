//! Score preview handler (no persistence, no external calls)

use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use shared::{score_breakdown, validate_sample, FertilizerAdvice, Language, ScoreResult, SoilSample};

#[derive(Debug, Deserialize)]
pub struct ScorePreviewInput {
    #[serde(flatten)]
    pub sample: SoilSample,
    #[serde(default)]
    pub language: Language,
}

/// Compute the soil health score for a sample
pub async fn preview_score(Json(input): Json<ScorePreviewInput>) -> AppResult<Json<ScoreResult>> {
    validate_sample(&input.sample).map_err(|m| {
        AppError::validation("ph_level", m, "pH का मान 0 से 14 के बीच होना चाहिए")
    })?;

    let mut result = score_breakdown(&input.sample);
    result.advisory = FertilizerAdvice::for_nitrogen(input.sample.nitrogen)
        .message(input.language)
        .to_string();
    Ok(Json(result))
}
