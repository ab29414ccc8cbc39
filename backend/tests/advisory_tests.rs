//! Soil advisory orchestration tests
//!
//! Runs with no API keys configured, so weather, LLM and speech all take
//! their offline paths and no network traffic is made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{routing::post, Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::{Language, NutrientLevel, SoilSample};
use soil_advisor::error::AppError;
use soil_advisor::external::llm::ANALYSIS_UNAVAILABLE;
use soil_advisor::external::LlmClient;
use soil_advisor::external::weather::WEATHER_KEY_MISSING;
use soil_advisor::services::advice_cache::advice_cache_key;
use soil_advisor::services::advisory::{assemble_report, AdvisoryService, AnalyzeSoilInput};
use soil_advisor::services::ReportStore;
use soil_advisor::{db, AppState, Config};
use tokio_test::{assert_err, assert_ok};

async fn offline_state() -> AppState {
    let config = Config::defaults().unwrap();
    let pool = db::connect_url("sqlite::memory:", 1, 1).await.unwrap();
    AppState::new(pool, config).unwrap()
}

/// Serve `/chat/completions` on a local port, counting requests
async fn spawn_completion_server(reply: &'static str) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let app = Router::new().route(
        "/chat/completions",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json::<Value>(json!({
                    "choices": [{"message": {"role": "assistant", "content": reply}}]
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

fn service_with_llm(state: &AppState, llm: LlmClient) -> AdvisoryService {
    AdvisoryService::new(
        ReportStore::new(state.db.clone()),
        state.weather.clone(),
        llm,
        state.tts.clone(),
        state.advice_cache.clone(),
    )
}

fn sample(ph: i64, nitrogen: NutrientLevel) -> SoilSample {
    SoilSample::new(
        Decimal::new(ph, 1),
        nitrogen,
        NutrientLevel::Medium,
        NutrientLevel::Medium,
        NutrientLevel::Medium,
    )
}

fn input(ph: i64, nitrogen: NutrientLevel, language: Language) -> AnalyzeSoilInput {
    AnalyzeSoilInput {
        farmer_name: "Ramlal".to_string(),
        city: "Jaipur".to_string(),
        sample: sample(ph, nitrogen),
        language,
        include_audio: true,
    }
}

// ============================================================================
// Offline Analysis
// ============================================================================

#[tokio::test]
async fn test_offline_analysis_uses_placeholders_and_persists() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);

    let analysis = assert_ok!(service.analyze(input(65, NutrientLevel::Low, Language::Hindi)).await);

    assert_eq!(analysis.score, 80);
    assert_eq!(analysis.weather, WEATHER_KEY_MISSING);
    assert_eq!(analysis.analysis, ANALYSIS_UNAVAILABLE);
    assert!(!analysis.analysis_cached);
    assert_eq!(analysis.advisory, "यूरिया 45-50 kg प्रति एकड़ डालें।");
    assert!(analysis.report_text.starts_with("🌱 Soil Health Score: 80/100"));
    // No TTS key means no audio even when requested
    assert!(analysis.audio_base64.is_none());

    let stored = assert_ok!(ReportStore::new(state.db.clone()).recent_reports(1).await);
    assert_eq!(stored[0].id, analysis.report_id);
    assert_eq!(stored[0].farmer_name, "Ramlal");
}

#[tokio::test]
async fn test_english_report_headings() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);

    let analysis =
        assert_ok!(service.analyze(input(70, NutrientLevel::High, Language::English)).await);

    assert_eq!(analysis.score, 100);
    assert_eq!(analysis.advisory, "Nitrogen is balanced.");
    assert!(analysis.report_text.contains("Fertilizer Advice:\nNitrogen is balanced."));
}

#[tokio::test]
async fn test_cached_advice_is_served() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);
    let request = input(65, NutrientLevel::Medium, Language::Hindi);

    let key = advice_cache_key(
        &state.config.llm.model,
        Language::Hindi,
        &request.sample,
        WEATHER_KEY_MISSING,
    );
    state
        .advice_cache
        .insert(key, "मिट्टी में जैविक खाद मिलाएं।".to_string())
        .await;

    let analysis = assert_ok!(service.analyze(request).await);
    assert!(analysis.analysis_cached);
    assert_eq!(analysis.analysis, "मिट्टी में जैविक खाद मिलाएं।");
}

#[tokio::test]
async fn test_missing_key_advice_is_not_cached() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);

    assert_ok!(service.analyze(input(65, NutrientLevel::Low, Language::Hindi)).await);
    assert!(state.advice_cache.is_empty().await);
}

#[tokio::test]
async fn test_successful_advice_is_cached() {
    let state = offline_state().await;
    let (base_url, calls) = spawn_completion_server("  जैविक खाद डालें।  ").await;
    let llm = LlmClient::with_base_url(Some("test-key".into()), base_url, "test-model".into());
    let service = service_with_llm(&state, llm);
    let soil = sample(65, NutrientLevel::Low);

    let first = service.advice_for(&soil, WEATHER_KEY_MISSING, Language::Hindi).await;
    assert_eq!(first.text, "जैविक खाद डालें।");
    assert!(!first.cached);
    assert_eq!(state.advice_cache.len().await, 1);

    let second = service.advice_for(&soil, WEATHER_KEY_MISSING, Language::Hindi).await;
    assert_eq!(second.text, first.text);
    assert!(second.cached);
    assert_eq!(state.advice_cache.len().await, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A different language is a different request
    let english = service.advice_for(&soil, WEATHER_KEY_MISSING, Language::English).await;
    assert!(!english.cached);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_failure_is_not_cached() {
    let state = offline_state().await;
    let llm = LlmClient::with_base_url(
        Some("test-key".into()),
        "http://127.0.0.1:9".into(),
        "test-model".into(),
    );
    let service = service_with_llm(&state, llm);
    let soil = sample(65, NutrientLevel::Low);

    let advice = service.advice_for(&soil, WEATHER_KEY_MISSING, Language::Hindi).await;
    assert_eq!(advice.text, ANALYSIS_UNAVAILABLE);
    assert!(!advice.cached);
    assert!(state.advice_cache.is_empty().await);

    // The next request tries the provider again instead of replaying the failure
    let retry = service.advice_for(&soil, WEATHER_KEY_MISSING, Language::Hindi).await;
    assert!(!retry.cached);
}

#[tokio::test]
async fn test_analysis_reports_fresh_then_cached_advice() {
    let state = offline_state().await;
    let (base_url, calls) = spawn_completion_server("फसल चक्र अपनाएं।").await;
    let llm = LlmClient::with_base_url(Some("test-key".into()), base_url, "test-model".into());
    let service = service_with_llm(&state, llm);

    let first = assert_ok!(service.analyze(input(65, NutrientLevel::Low, Language::Hindi)).await);
    let second = assert_ok!(service.analyze(input(65, NutrientLevel::Low, Language::Hindi)).await);

    assert_eq!(first.analysis, "फसल चक्र अपनाएं।");
    assert!(!first.analysis_cached);
    assert!(second.analysis_cached);
    assert!(second.report_id > first.report_id);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Validation and Storage Failure
// ============================================================================

#[tokio::test]
async fn test_out_of_range_ph_rejected_before_storage() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);

    let err = assert_err!(service.analyze(input(150, NutrientLevel::Low, Language::Hindi)).await);
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "ph_level"));

    assert_eq!(assert_ok!(ReportStore::new(state.db.clone()).count().await), 0);
}

#[tokio::test]
async fn test_free_text_name_accepted() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);
    let mut request = input(65, NutrientLevel::Low, Language::Hindi);
    request.farmer_name = "Ram\tlal\nJaipur".to_string();

    let analysis = assert_ok!(service.analyze(request).await);
    assert_eq!(analysis.farmer_name, "Ram\tlal\nJaipur");
}

#[tokio::test]
async fn test_overlong_name_rejected() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);
    let mut request = input(65, NutrientLevel::Low, Language::Hindi);
    request.farmer_name = "a".repeat(101);

    let err = assert_err!(service.analyze(request).await);
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "farmer_name"));
    assert_eq!(assert_ok!(ReportStore::new(state.db.clone()).count().await), 0);
}

#[tokio::test]
async fn test_storage_failure_surfaces() {
    let state = offline_state().await;
    let service = AdvisoryService::from_state(&state);
    state.db.close().await;

    let err = assert_err!(service.analyze(input(65, NutrientLevel::Low, Language::Hindi)).await);
    assert!(err.is_storage_unavailable());
}

// ============================================================================
// Report Layout
// ============================================================================

#[test]
fn test_assemble_report_layout() {
    let text = assemble_report(85, "तापमान: 31°C, मौसम: साफ आसमान", "ठीक है", "नाइट्रोजन संतुलित है।", Language::Hindi);

    assert_eq!(
        text,
        "🌱 Soil Health Score: 85/100\n\n\
         🌦 मौसम जानकारी:\nतापमान: 31°C, मौसम: साफ आसमान\n\n\
         🤖 AI विश्लेषण:\nठीक है\n\n\
         💊 उर्वरक सलाह:\nनाइट्रोजन संतुलित है।\n"
    );
}
