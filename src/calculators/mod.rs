//! Patient hub calculators
//!
//! Pure health calculators. Incomplete input never errors: the calculators
//! return `None` and the caller keeps whatever it was showing before.

pub mod bmi;
pub mod insulin;

pub use bmi::{calculate_bmi, BmiCalculator, BmiCategory, BmiInput, BmiResult, UnitSystem};
pub use insulin::{
    calculate_insulin_dose, InsulinCalculator, InsulinInput, InsulinMode, InsulinResult,
    SAFETY_DISCLAIMER,
};

/// Round to one decimal place for display
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse a numeric form field as typed by a user
///
/// Blank or non-numeric text is treated as missing.
pub fn parse_field(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A value usable as a divisor or body measurement: finite and strictly positive
pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// A finite, non-negative reading (carb grams, blood glucose)
pub(crate) fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}
