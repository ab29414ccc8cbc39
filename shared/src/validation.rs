//! Validation utilities for soil report submissions
//!
//! Invalid input is rejected here, at the point of collection, so the scoring
//! functions only ever see samples inside their declared domain.

use rust_decimal::Decimal;

use crate::models::SoilSample;

/// Longest farmer name accepted by the form
pub const MAX_FARMER_NAME_CHARS: usize = 100;

/// Longest city name accepted for weather lookup
pub const MAX_CITY_CHARS: usize = 85;

// ============================================================================
// Soil Validations
// ============================================================================

/// Validate pH is inside the 0-14 scale
pub fn validate_ph_level(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

/// Convert a form pH value to a decimal, rejecting NaN and infinities
pub fn ph_from_f64(ph: f64) -> Result<Decimal, &'static str> {
    if !ph.is_finite() {
        return Err("pH must be a finite number");
    }
    let value = Decimal::try_from(ph).map_err(|_| "pH is not representable")?;
    validate_ph_level(value)?;
    Ok(value)
}

/// Validate a full soil sample
pub fn validate_sample(sample: &SoilSample) -> Result<(), &'static str> {
    validate_ph_level(sample.ph_level)
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate farmer name length. The name is a free-text label: empty and
/// multi-line values are accepted.
pub fn validate_farmer_name(name: &str) -> Result<(), &'static str> {
    if name.chars().count() > MAX_FARMER_NAME_CHARS {
        return Err("Farmer name must be at most 100 characters");
    }
    Ok(())
}

/// Validate city name used for weather lookup (empty is allowed)
pub fn validate_city(city: &str) -> Result<(), &'static str> {
    if city.chars().count() > MAX_CITY_CHARS {
        return Err("City name must be at most 85 characters");
    }
    if city.chars().any(|c| c.is_control() || c == '&' || c == '?' || c == '#') {
        return Err("City name contains invalid characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientLevel;

    #[test]
    fn test_validate_ph_level() {
        assert!(validate_ph_level(Decimal::ZERO).is_ok());
        assert!(validate_ph_level(Decimal::from(7)).is_ok());
        assert!(validate_ph_level(Decimal::from(14)).is_ok());
        assert!(validate_ph_level(Decimal::from(-1)).is_err());
        assert!(validate_ph_level(Decimal::new(141, 1)).is_err());
    }

    #[test]
    fn test_ph_from_f64() {
        assert_eq!(ph_from_f64(6.5).unwrap(), Decimal::new(65, 1));
        assert!(ph_from_f64(f64::NAN).is_err());
        assert!(ph_from_f64(f64::INFINITY).is_err());
        assert!(ph_from_f64(15.0).is_err());
    }

    #[test]
    fn test_validate_sample() {
        let sample = SoilSample::new(
            Decimal::from(20),
            NutrientLevel::Low,
            NutrientLevel::Low,
            NutrientLevel::Low,
            NutrientLevel::Low,
        );
        assert!(validate_sample(&sample).is_err());
    }

    #[test]
    fn test_validate_farmer_name() {
        assert!(validate_farmer_name("").is_ok());
        assert!(validate_farmer_name("रामलाल").is_ok());
        assert!(validate_farmer_name(&"a".repeat(101)).is_err());
        assert!(validate_farmer_name(&"अ".repeat(100)).is_ok());
        assert!(validate_farmer_name("Ram\tlal\nJaipur").is_ok());
    }

    #[test]
    fn test_validate_city() {
        assert!(validate_city("Jaipur").is_ok());
        assert!(validate_city("").is_ok());
        assert!(validate_city("Pune&appid=x").is_err());
    }
}
