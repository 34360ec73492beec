//! Insulin dose calculator
//!
//! Estimates a bolus from carbohydrate intake and/or a blood glucose
//! correction. Values are computed at full precision and rounded to one
//! decimal only when reported.

use serde::{Deserialize, Serialize};

use super::{non_negative, parse_field, positive, round_tenth};

/// Shown alongside every dose estimate
pub const SAFETY_DISCLAIMER: &str = "This calculator provides an estimate for educational \
purposes only and is not a substitute for medical advice. Always confirm your insulin dose \
with your doctor, diabetes educator, or pharmacist before making changes to your treatment.";

/// Which dose the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsulinMode {
    /// Carbohydrate coverage, optionally plus a correction
    #[default]
    Mealtime,
    /// Correction for high blood glucose only
    Correction,
}

impl InsulinMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsulinMode::Mealtime => "mealtime",
            InsulinMode::Correction => "correction",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mealtime" | "meal" | "bolus" => Some(InsulinMode::Mealtime),
            "correction" | "correct" => Some(InsulinMode::Correction),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InsulinMode::Mealtime => "Mealtime dose",
            InsulinMode::Correction => "Correction dose",
        }
    }
}

/// Input to the dose calculation; all readings in grams or mg/dL
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InsulinInput {
    #[serde(default)]
    pub mode: InsulinMode,
    pub carb_grams: Option<f64>,
    /// Grams of carbohydrate covered by one unit
    pub carb_ratio: Option<f64>,
    pub current_bg: Option<f64>,
    pub target_bg: Option<f64>,
    /// mg/dL drop per unit
    pub correction_factor: Option<f64>,
}

impl InsulinInput {
    pub fn mealtime(carb_grams: f64, carb_ratio: f64) -> Self {
        Self {
            mode: InsulinMode::Mealtime,
            carb_grams: Some(carb_grams),
            carb_ratio: Some(carb_ratio),
            ..Self::default()
        }
    }

    pub fn correction(current_bg: f64, target_bg: f64, correction_factor: f64) -> Self {
        Self {
            mode: InsulinMode::Correction,
            current_bg: Some(current_bg),
            target_bg: Some(target_bg),
            correction_factor: Some(correction_factor),
            ..Self::default()
        }
    }

    /// Add correction readings to a mealtime input
    pub fn with_correction(mut self, current_bg: f64, target_bg: f64, correction_factor: f64) -> Self {
        self.current_bg = Some(current_bg);
        self.target_bg = Some(target_bg);
        self.correction_factor = Some(correction_factor);
        self
    }

    /// Unrounded correction units, if all three readings are usable
    fn correction_units(&self) -> Option<f64> {
        let current = non_negative(self.current_bg)?;
        let target = non_negative(self.target_bg)?;
        let factor = positive(self.correction_factor)?;
        // At or below target: no correction, never a negative dose
        Some(((current - target) / factor).max(0.0))
    }

    /// Correction readings that were entered but cannot be used
    ///
    /// Only mealtime reports these, since there the correction is optional
    /// and an unusable one is dropped rather than withholding the dose.
    /// Empty when no correction reading was entered at all.
    pub fn ignored_correction_fields(&self) -> Vec<&'static str> {
        let entered = [self.current_bg, self.target_bg, self.correction_factor]
            .iter()
            .any(Option::is_some);
        if self.mode != InsulinMode::Mealtime || !entered || self.correction_units().is_some() {
            return Vec::new();
        }

        [
            ("current_bg", non_negative(self.current_bg).is_some()),
            ("target_bg", non_negative(self.target_bg).is_some()),
            ("correction_factor", positive(self.correction_factor).is_some()),
        ]
        .into_iter()
        .filter(|(_, usable)| !usable)
        .map(|(name, _)| name)
        .collect()
    }

    fn carb_units(&self) -> Option<f64> {
        let grams = non_negative(self.carb_grams)?;
        let ratio = positive(self.carb_ratio)?;
        Some(grams / ratio)
    }
}

/// Dose breakdown, each value rounded to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsulinResult {
    pub mode: InsulinMode,
    pub total_dose: f64,
    pub carb_component: f64,
    pub correction_component: f64,
    /// Whether a correction was part of the total
    pub correction_applied: bool,
}

/// Compute the dose, or `None` when a required field for the mode is missing
///
/// Zero or negative ratios and factors count as missing.
pub fn calculate_insulin_dose(input: &InsulinInput) -> Option<InsulinResult> {
    let (carb, correction) = match input.mode {
        InsulinMode::Mealtime => (input.carb_units()?, input.correction_units()),
        InsulinMode::Correction => (0.0, Some(input.correction_units()?)),
    };

    let total = carb + correction.unwrap_or(0.0);
    if !total.is_finite() {
        return None;
    }

    Some(InsulinResult {
        mode: input.mode,
        total_dose: round_tenth(total),
        carb_component: round_tenth(carb),
        correction_component: round_tenth(correction.unwrap_or(0.0)),
        correction_applied: correction.is_some(),
    })
}

// ============================================================================
// Calculator panel state
// ============================================================================

/// Field text and last result for an insulin calculator panel
#[derive(Debug, Clone, Default)]
pub struct InsulinCalculator {
    mode: InsulinMode,
    carb_grams: String,
    carb_ratio: String,
    current_bg: String,
    target_bg: String,
    correction_factor: String,
    result: Option<InsulinResult>,
}

impl InsulinCalculator {
    pub fn new(mode: InsulinMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> InsulinMode {
        self.mode
    }

    /// Switching modes drops the previous result since it answers a different question
    pub fn set_mode(&mut self, mode: InsulinMode) {
        if self.mode != mode {
            self.mode = mode;
            self.result = None;
        }
    }

    pub fn set_carb_grams(&mut self, text: impl Into<String>) {
        self.carb_grams = text.into();
    }

    pub fn set_carb_ratio(&mut self, text: impl Into<String>) {
        self.carb_ratio = text.into();
    }

    pub fn set_current_bg(&mut self, text: impl Into<String>) {
        self.current_bg = text.into();
    }

    pub fn set_target_bg(&mut self, text: impl Into<String>) {
        self.target_bg = text.into();
    }

    pub fn set_correction_factor(&mut self, text: impl Into<String>) {
        self.correction_factor = text.into();
    }

    pub fn input(&self) -> InsulinInput {
        InsulinInput {
            mode: self.mode,
            carb_grams: parse_field(&self.carb_grams),
            carb_ratio: parse_field(&self.carb_ratio),
            current_bg: parse_field(&self.current_bg),
            target_bg: parse_field(&self.target_bg),
            correction_factor: parse_field(&self.correction_factor),
        }
    }

    /// Recalculate; incomplete input keeps the previous result
    pub fn calculate(&mut self) -> Option<&InsulinResult> {
        if let Some(result) = calculate_insulin_dose(&self.input()) {
            self.result = Some(result);
        }
        self.result.as_ref()
    }

    pub fn result(&self) -> Option<&InsulinResult> {
        self.result.as_ref()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
    }
}
