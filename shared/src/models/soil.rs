//! Soil sample models and the soil health score

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::advisory::fertilizer_advice;

/// Score of a sample with no penalties
pub const MAX_SCORE: u32 = 100;

/// Penalty when pH is outside the acceptable band
pub const PH_PENALTY: u32 = 15;
pub const NITROGEN_PENALTY: u32 = 20;
pub const PHOSPHORUS_PENALTY: u32 = 15;
pub const POTASSIUM_PENALTY: u32 = 15;
pub const ORGANIC_CARBON_PENALTY: u32 = 20;

/// Lower edge of the acceptable pH band (inclusive)
pub fn ph_band_min() -> Decimal {
    Decimal::new(55, 1)
}

/// Upper edge of the acceptable pH band (inclusive)
pub fn ph_band_max() -> Decimal {
    Decimal::new(80, 1)
}

/// Nutrient level as reported by a soil test
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "Low",
            NutrientLevel::Medium => "Medium",
            NutrientLevel::High => "High",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, NutrientLevel::Low)
    }
}

impl std::fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a nutrient level is not one of Low, Medium, High
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown nutrient level: {0}")]
pub struct ParseLevelError(pub String);

impl std::str::FromStr for NutrientLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(NutrientLevel::Low),
            "medium" => Ok(NutrientLevel::Medium),
            "high" => Ok(NutrientLevel::High),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// A soil test result submitted by a farmer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoilSample {
    pub ph_level: Decimal,
    pub nitrogen: NutrientLevel,
    pub phosphorus: NutrientLevel,
    pub potassium: NutrientLevel,
    pub organic_carbon: NutrientLevel,
}

impl SoilSample {
    pub fn new(
        ph_level: Decimal,
        nitrogen: NutrientLevel,
        phosphorus: NutrientLevel,
        potassium: NutrientLevel,
        organic_carbon: NutrientLevel,
    ) -> Self {
        Self {
            ph_level,
            nitrogen,
            phosphorus,
            potassium,
            organic_carbon,
        }
    }

    /// Whether pH lies inside the 5.5-8.0 band
    pub fn is_ph_acceptable(&self) -> bool {
        self.ph_level >= ph_band_min() && self.ph_level <= ph_band_max()
    }
}

/// Factors that can cost points on the health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilFactor {
    PhLevel,
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicCarbon,
}

impl std::fmt::Display for SoilFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilFactor::PhLevel => write!(f, "pH"),
            SoilFactor::Nitrogen => write!(f, "Nitrogen"),
            SoilFactor::Phosphorus => write!(f, "Phosphorus"),
            SoilFactor::Potassium => write!(f, "Potassium"),
            SoilFactor::OrganicCarbon => write!(f, "Organic Carbon"),
        }
    }
}

/// A single flat penalty applied to the score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deduction {
    pub factor: SoilFactor,
    pub points: u32,
}

/// Score together with the penalties that produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    pub advisory: String,
    pub deductions: Vec<Deduction>,
}

/// List the penalties that apply to a sample
pub fn deductions_for(sample: &SoilSample) -> Vec<Deduction> {
    let checks = [
        (!sample.is_ph_acceptable(), SoilFactor::PhLevel, PH_PENALTY),
        (sample.nitrogen.is_low(), SoilFactor::Nitrogen, NITROGEN_PENALTY),
        (sample.phosphorus.is_low(), SoilFactor::Phosphorus, PHOSPHORUS_PENALTY),
        (sample.potassium.is_low(), SoilFactor::Potassium, POTASSIUM_PENALTY),
        (
            sample.organic_carbon.is_low(),
            SoilFactor::OrganicCarbon,
            ORGANIC_CARBON_PENALTY,
        ),
    ];

    checks
        .into_iter()
        .filter(|(applies, _, _)| *applies)
        .map(|(_, factor, points)| Deduction { factor, points })
        .collect()
}

/// Subtract deductions from the maximum score, flooring at zero
pub fn apply_deductions(deductions: &[Deduction]) -> u32 {
    let total: u32 = deductions.iter().map(|d| d.points).sum();
    MAX_SCORE.saturating_sub(total)
}

/// Compute the 0-100 soil health score
pub fn compute_score(sample: &SoilSample) -> u32 {
    apply_deductions(&deductions_for(sample))
}

/// Compute the score, the applied penalties and the fertilizer advisory
pub fn score_breakdown(sample: &SoilSample) -> ScoreResult {
    let deductions = deductions_for(sample);
    ScoreResult {
        score: apply_deductions(&deductions),
        advisory: fertilizer_advice(sample.nitrogen).to_string(),
        deductions,
    }
}
