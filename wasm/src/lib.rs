//! WebAssembly module for the Soil Health Advisory Platform
//!
//! Provides client-side computation for:
//! - Live soil health score preview on the submission form
//! - Fertilizer recommendation text
//! - pH input validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_level(field: &str, value: &str) -> Result<NutrientLevel, JsValue> {
    value
        .parse::<NutrientLevel>()
        .map_err(|e| JsValue::from_str(&format!("{}: {}", field, e)))
}

fn build_sample(
    ph: f64,
    nitrogen: &str,
    phosphorus: &str,
    potassium: &str,
    organic_carbon: &str,
) -> Result<SoilSample, JsValue> {
    let ph_level = ph_from_f64(ph).map_err(JsValue::from_str)?;
    Ok(SoilSample::new(
        ph_level,
        parse_level("nitrogen", nitrogen)?,
        parse_level("phosphorus", phosphorus)?,
        parse_level("potassium", potassium)?,
        parse_level("organic_carbon", organic_carbon)?,
    ))
}

/// Calculate the soil health score (0-100) for the form values
#[wasm_bindgen]
pub fn calculate_soil_score(
    ph: f64,
    nitrogen: &str,
    phosphorus: &str,
    potassium: &str,
    organic_carbon: &str,
) -> Result<u32, JsValue> {
    let sample = build_sample(ph, nitrogen, phosphorus, potassium, organic_carbon)?;
    Ok(compute_score(&sample))
}

/// Score breakdown as JSON (score, advisory, deductions)
#[wasm_bindgen]
pub fn soil_score_breakdown_json(
    ph: f64,
    nitrogen: &str,
    phosphorus: &str,
    potassium: &str,
    organic_carbon: &str,
) -> Result<String, JsValue> {
    let sample = build_sample(ph, nitrogen, phosphorus, potassium, organic_carbon)?;
    serde_json::to_string(&score_breakdown(&sample))
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize breakdown: {}", e)))
}

/// Fertilizer recommendation for a nitrogen level ("hi" or "en")
#[wasm_bindgen]
pub fn fertilizer_recommendation(nitrogen: &str, language: &str) -> Result<String, JsValue> {
    let level = parse_level("nitrogen", nitrogen)?;
    let language = language.parse::<Language>().unwrap_or_else(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&format!("{}, using Hindi", e)));
        Language::Hindi
    });
    Ok(FertilizerAdvice::for_nitrogen(level)
        .message(language)
        .to_string())
}

/// Check a pH value before submission
#[wasm_bindgen]
pub fn is_valid_ph(ph: f64) -> bool {
    ph_from_f64(ph).is_ok()
}
