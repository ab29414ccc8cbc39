//! Fertilizer advisory keyed on nitrogen level

use serde::{Deserialize, Serialize};

use super::soil::NutrientLevel;
use crate::types::Language;

/// Fixed fertilizer recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FertilizerAdvice {
    /// Apply 45-50 kg urea per acre
    ApplyUrea,
    NitrogenBalanced,
}

impl FertilizerAdvice {
    pub fn for_nitrogen(nitrogen: NutrientLevel) -> Self {
        if nitrogen.is_low() {
            FertilizerAdvice::ApplyUrea
        } else {
            FertilizerAdvice::NitrogenBalanced
        }
    }

    pub fn message(&self, language: Language) -> &'static str {
        match (self, language) {
            (FertilizerAdvice::ApplyUrea, Language::Hindi) => "यूरिया 45-50 kg प्रति एकड़ डालें।",
            (FertilizerAdvice::ApplyUrea, Language::English) => {
                "Apply 45-50 kg of urea per acre."
            }
            (FertilizerAdvice::NitrogenBalanced, Language::Hindi) => "नाइट्रोजन संतुलित है।",
            (FertilizerAdvice::NitrogenBalanced, Language::English) => "Nitrogen is balanced.",
        }
    }
}

/// Fertilizer advisory in the default language (Hindi)
pub fn fertilizer_advice(nitrogen: NutrientLevel) -> &'static str {
    FertilizerAdvice::for_nitrogen(nitrogen).message(Language::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_nitrogen_recommends_urea() {
        assert_eq!(fertilizer_advice(NutrientLevel::Low), "यूरिया 45-50 kg प्रति एकड़ डालें।");
    }

    #[test]
    fn test_medium_and_high_are_balanced() {
        assert_eq!(fertilizer_advice(NutrientLevel::Medium), "नाइट्रोजन संतुलित है।");
        assert_eq!(
            fertilizer_advice(NutrientLevel::High),
            fertilizer_advice(NutrientLevel::Medium)
        );
    }

    #[test]
    fn test_english_messages() {
        assert_eq!(
            FertilizerAdvice::for_nitrogen(NutrientLevel::Low).message(Language::English),
            "Apply 45-50 kg of urea per acre."
        );
        assert_eq!(
            FertilizerAdvice::for_nitrogen(NutrientLevel::High).message(Language::English),
            "Nitrogen is balanced."
        );
    }
}
