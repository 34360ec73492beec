//! Calculator MCP Tools
//!
//! Wraps the BMI and insulin calculators with tool-friendly responses.

use serde::Serialize;

use crate::calculators::{
    self, BmiInput, InsulinInput, InsulinMode, UnitSystem, SAFETY_DISCLAIMER,
};

/// Response for calculate_bmi
#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub calculated: bool,
    pub unit_system: String,
    pub height_unit: &'static str,
    pub weight_unit: &'static str,
    pub bmi: Option<f64>,
    pub category: Option<String>,
    pub category_display: Option<String>,
    pub category_range: Option<String>,
    /// Set when no result could be calculated
    pub message: Option<String>,
}

/// Response for calculate_insulin_dose
#[derive(Debug, Serialize)]
pub struct InsulinResponse {
    pub calculated: bool,
    pub mode: String,
    pub total_dose: Option<f64>,
    pub carb_component: Option<f64>,
    pub correction_component: Option<f64>,
    pub correction_applied: bool,
    /// Required fields that are missing or unusable for this mode
    pub missing_fields: Vec<&'static str>,
    /// Mealtime correction readings that were entered but left out of the dose
    pub ignored_correction_fields: Vec<&'static str>,
    /// Explains a dropped correction
    pub note: Option<String>,
    pub disclaimer: &'static str,
}

// ============================================================================
// Tool Functions
// ============================================================================

pub fn calculate_bmi(
    height: Option<f64>,
    weight: Option<f64>,
    unit_system: &str,
) -> Result<BmiResponse, String> {
    let unit_system = UnitSystem::from_str(unit_system).ok_or_else(|| {
        format!("Invalid unit system: '{}'. Valid systems: metric, imperial", unit_system)
    })?;

    let input = BmiInput { height, weight, unit_system };
    let result = calculators::calculate_bmi(&input);

    let message = match result {
        Some(_) => None,
        None => Some(format!(
            "Enter a positive height ({}) and weight ({}) to calculate BMI",
            unit_system.height_unit(),
            unit_system.weight_unit()
        )),
    };

    Ok(BmiResponse {
        calculated: result.is_some(),
        unit_system: unit_system.as_str().to_string(),
        height_unit: unit_system.height_unit(),
        weight_unit: unit_system.weight_unit(),
        bmi: result.map(|r| r.bmi),
        category: result.map(|r| r.category.as_str().to_string()),
        category_display: result.map(|r| r.category.display_name().to_string()),
        category_range: result.map(|r| r.category.range_label().to_string()),
        message,
    })
}

/// Which required inputs are absent or unusable for the selected mode
fn missing_fields(input: &InsulinInput) -> Vec<&'static str> {
    let required: Vec<(&'static str, bool)> = match input.mode {
        InsulinMode::Mealtime => vec![
            ("carb_grams", calculators::non_negative(input.carb_grams).is_some()),
            ("carb_ratio", calculators::positive(input.carb_ratio).is_some()),
        ],
        InsulinMode::Correction => vec![
            ("current_bg", calculators::non_negative(input.current_bg).is_some()),
            ("target_bg", calculators::non_negative(input.target_bg).is_some()),
            ("correction_factor", calculators::positive(input.correction_factor).is_some()),
        ],
    };

    required
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
}

pub fn calculate_insulin_dose(mode: &str, input: InsulinInput) -> Result<InsulinResponse, String> {
    let mode = InsulinMode::from_str(mode)
        .ok_or_else(|| format!("Invalid mode: '{}'. Valid modes: mealtime, correction", mode))?;
    let input = InsulinInput { mode, ..input };

    let result = calculators::calculate_insulin_dose(&input);
    let ignored_correction_fields = if result.is_some() {
        input.ignored_correction_fields()
    } else {
        Vec::new()
    };
    let note = (!ignored_correction_fields.is_empty()).then(|| {
        format!(
            "Correction not included: {} missing or invalid (correction factor must be positive, readings not negative)",
            ignored_correction_fields.join(", ")
        )
    });

    Ok(InsulinResponse {
        calculated: result.is_some(),
        mode: mode.as_str().to_string(),
        total_dose: result.map(|r| r.total_dose),
        carb_component: result.map(|r| r.carb_component),
        correction_component: result.map(|r| r.correction_component),
        correction_applied: result.map(|r| r.correction_applied).unwrap_or(false),
        missing_fields: if result.is_some() { Vec::new() } else { missing_fields(&input) },
        ignored_correction_fields,
        note,
        disclaimer: SAFETY_DISCLAIMER,
    })
}
