//! Soil advisory orchestration
//!
//! Scores a submission, gathers weather and LLM advice, assembles the report
//! text, persists the sample and optionally voices the report. External
//! collaborators degrade to placeholders; only storage failures surface as
//! errors.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::external::llm::{build_prompt, ANALYSIS_UNAVAILABLE};
use crate::external::{LlmClient, TtsClient, WeatherClient};
use crate::services::advice_cache::{advice_cache_key, AdviceCache};
use crate::services::report_store::ReportStore;
use crate::AppState;
use shared::{
    score_breakdown, validate_city, validate_farmer_name, validate_sample, Deduction,
    FertilizerAdvice, Language, NewReport, SoilSample,
};

/// Advisory service for analysing soil submissions
#[derive(Clone)]
pub struct AdvisoryService {
    store: ReportStore,
    weather: WeatherClient,
    llm: LlmClient,
    tts: TtsClient,
    cache: AdviceCache,
}

/// Input for analysing a soil submission
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeSoilInput {
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(flatten)]
    pub sample: SoilSample,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub include_audio: bool,
}

/// Result of a soil analysis
#[derive(Debug, Clone, Serialize)]
pub struct SoilAnalysis {
    pub report_id: i64,
    pub farmer_name: String,
    pub score: u32,
    pub deductions: Vec<Deduction>,
    pub advisory: String,
    pub weather: String,
    pub analysis: String,
    pub analysis_cached: bool,
    pub report_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
}

/// Advice text and whether it came from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub text: String,
    pub cached: bool,
}

/// Lay out the final report text
pub fn assemble_report(
    score: u32,
    weather: &str,
    analysis: &str,
    advisory: &str,
    language: Language,
) -> String {
    let (weather_heading, analysis_heading, advisory_heading) = match language {
        Language::Hindi => ("मौसम जानकारी", "AI विश्लेषण", "उर्वरक सलाह"),
        Language::English => ("Weather", "AI Analysis", "Fertilizer Advice"),
    };

    format!(
        "🌱 Soil Health Score: {}/100\n\n\
         🌦 {}:\n{}\n\n\
         🤖 {}:\n{}\n\n\
         💊 {}:\n{}\n",
        score,
        weather_heading,
        weather,
        analysis_heading,
        analysis,
        advisory_heading,
        advisory
    )
}

fn field_error(field: &str, message: &'static str, message_hi: &str) -> AppError {
    AppError::validation(field, message, message_hi)
}

/// Reject submissions outside the accepted input domain
pub fn validate_analyze_input(input: &AnalyzeSoilInput) -> AppResult<()> {
    validate_sample(&input.sample)
        .map_err(|m| field_error("ph_level", m, "pH का मान 0 से 14 के बीच होना चाहिए"))?;
    validate_farmer_name(&input.farmer_name)
        .map_err(|m| field_error("farmer_name", m, "किसान का नाम अमान्य है"))?;
    validate_city(&input.city).map_err(|m| field_error("city", m, "शहर का नाम अमान्य है"))?;
    Ok(())
}

impl AdvisoryService {
    /// Create a new AdvisoryService instance
    pub fn new(
        store: ReportStore,
        weather: WeatherClient,
        llm: LlmClient,
        tts: TtsClient,
        cache: AdviceCache,
    ) -> Self {
        Self {
            store,
            weather,
            llm,
            tts,
            cache,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            ReportStore::new(state.db.clone()),
            state.weather.clone(),
            state.llm.clone(),
            state.tts.clone(),
            state.advice_cache.clone(),
        )
    }

    /// Analyse a submission and persist it
    pub async fn analyze(&self, input: AnalyzeSoilInput) -> AppResult<SoilAnalysis> {
        validate_analyze_input(&input)?;

        let result = score_breakdown(&input.sample);
        let advisory = FertilizerAdvice::for_nitrogen(input.sample.nitrogen)
            .message(input.language)
            .to_string();

        let weather = self.weather.summary_for_city(&input.city).await;
        let advice = self
            .advice_for(&input.sample, &weather, input.language)
            .await;

        let report_text = assemble_report(
            result.score,
            &weather,
            &advice.text,
            &advisory,
            input.language,
        );

        let report_id = self
            .store
            .insert(&NewReport::new(input.farmer_name.clone(), input.sample.clone()))
            .await?;

        tracing::info!(
            report_id,
            score = result.score,
            cached = advice.cached,
            "soil analysis completed"
        );

        // Speech consumes the finished report, so it runs after the LLM call.
        let audio_base64 = if input.include_audio {
            self.tts
                .try_synthesize(&report_text)
                .await
                .map(|audio| base64::engine::general_purpose::STANDARD.encode(audio))
        } else {
            None
        };

        Ok(SoilAnalysis {
            report_id,
            farmer_name: input.farmer_name,
            score: result.score,
            deductions: result.deductions,
            advisory,
            weather,
            analysis: advice.text,
            analysis_cached: advice.cached,
            report_text,
            audio_base64,
        })
    }

    /// LLM advice for a sample, served from cache within the TTL
    pub async fn advice_for(
        &self,
        sample: &SoilSample,
        weather: &str,
        language: Language,
    ) -> Advice {
        let key = advice_cache_key(self.llm.model(), language, sample, weather);
        if let Some(text) = self.cache.get(&key).await {
            tracing::debug!("advice cache hit");
            return Advice { text, cached: true };
        }

        if !self.llm.has_api_key() {
            tracing::warn!("LLM API key missing, using placeholder analysis");
            return Advice {
                text: ANALYSIS_UNAVAILABLE.to_string(),
                cached: false,
            };
        }

        let prompt = build_prompt(sample, weather, language);
        match self.llm.complete(&prompt).await {
            Ok(text) => {
                self.cache.insert(key, text.clone()).await;
                Advice {
                    text,
                    cached: false,
                }
            }
            Err(error) => {
                tracing::warn!(%error, "LLM advice failed");
                Advice {
                    text: ANALYSIS_UNAVAILABLE.to_string(),
                    cached: false,
                }
            }
        }
    }
}
