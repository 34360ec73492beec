//! BMI calculator
//!
//! Body Mass Index from height and weight in metric or imperial units.

use serde::{Deserialize, Serialize};

use super::{parse_field, positive, round_tenth};

/// Multiplier for the imperial (lb / in²) form of the BMI formula
pub const IMPERIAL_FACTOR: f64 = 703.0;

/// Centimeters per meter
const CM_PER_M: f64 = 100.0;

// ============================================================================
// Category bands (lower bounds, inclusive)
// ============================================================================

pub const NORMAL_WEIGHT_MIN: f64 = 18.5;
pub const OVERWEIGHT_MIN: f64 = 25.0;
pub const OBESITY_MIN: f64 = 30.0;

/// Measurement system for height and weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Height in centimeters, weight in kilograms
    #[default]
    Metric,
    /// Height in inches, weight in pounds
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" | "cm" | "kg" => Some(UnitSystem::Metric),
            "imperial" | "us" | "in" | "lb" | "lbs" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }

    pub fn height_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }
}

/// Weight category derived from a BMI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obesity,
}

impl BmiCategory {
    /// Classify a BMI value using half-open bands
    ///
    /// `[..18.5)` underweight, `[18.5, 25)` normal, `[25, 30)` overweight,
    /// `[30..]` obesity.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < NORMAL_WEIGHT_MIN {
            BmiCategory::Underweight
        } else if bmi < OVERWEIGHT_MIN {
            BmiCategory::NormalWeight
        } else if bmi < OBESITY_MIN {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::NormalWeight => "normal_weight",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obesity => "obesity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        }
    }

    /// Human-readable BMI range for this category
    pub fn range_label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "below 18.5",
            BmiCategory::NormalWeight => "18.5 - 24.9",
            BmiCategory::Overweight => "25.0 - 29.9",
            BmiCategory::Obesity => "30.0 and above",
        }
    }
}

/// Input to the BMI calculation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BmiInput {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit_system: UnitSystem,
}

impl BmiInput {
    pub fn new(height: f64, weight: f64, unit_system: UnitSystem) -> Self {
        Self {
            height: Some(height),
            weight: Some(weight),
            unit_system,
        }
    }
}

/// Computed BMI and its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI rounded to one decimal place
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Compute BMI, or `None` when height or weight is missing or not positive
pub fn calculate_bmi(input: &BmiInput) -> Option<BmiResult> {
    let height = positive(input.height)?;
    let weight = positive(input.weight)?;

    let raw = match input.unit_system {
        UnitSystem::Metric => {
            let meters = height / CM_PER_M;
            weight / (meters * meters)
        }
        UnitSystem::Imperial => IMPERIAL_FACTOR * weight / (height * height),
    };

    if !raw.is_finite() {
        return None;
    }

    // Classify on the unrounded value so 24.96 stays normal weight
    Some(BmiResult {
        bmi: round_tenth(raw),
        category: BmiCategory::from_bmi(raw),
    })
}

// ============================================================================
// Calculator panel state
// ============================================================================

/// State behind a BMI calculator panel: raw field text plus the last result
#[derive(Debug, Clone, Default)]
pub struct BmiCalculator {
    height: String,
    weight: String,
    unit_system: UnitSystem,
    result: Option<BmiResult>,
}

impl BmiCalculator {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            ..Self::default()
        }
    }

    pub fn set_height(&mut self, text: impl Into<String>) {
        self.height = text.into();
    }

    pub fn set_weight(&mut self, text: impl Into<String>) {
        self.weight = text.into();
    }

    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.unit_system = unit_system;
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Current field values as a calculation input
    pub fn input(&self) -> BmiInput {
        BmiInput {
            height: parse_field(&self.height),
            weight: parse_field(&self.weight),
            unit_system: self.unit_system,
        }
    }

    /// Recalculate from the current fields
    ///
    /// Incomplete input leaves the previous result in place.
    pub fn calculate(&mut self) -> Option<&BmiResult> {
        if let Some(result) = calculate_bmi(&self.input()) {
            self.result = Some(result);
        }
        self.result.as_ref()
    }

    pub fn result(&self) -> Option<&BmiResult> {
        self.result.as_ref()
    }

    /// Clear fields and result, keeping the selected unit system
    pub fn reset(&mut self) {
        self.height.clear();
        self.weight.clear();
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_bmi() {
        let result = calculate_bmi(&BmiInput::new(170.0, 70.0, UnitSystem::Metric)).unwrap();
        assert_eq!(result.bmi, 24.2);
        assert_eq!(result.category, BmiCategory::NormalWeight);
        assert_eq!(result.category.display_name(), "Normal weight");
    }

    #[test]
    fn test_imperial_bmi() {
        // 703 * 150 / 67^2 = 23.49...
        let result = calculate_bmi(&BmiInput::new(67.0, 150.0, UnitSystem::Imperial)).unwrap();
        assert!((result.bmi - 23.49).abs() < 0.1);
        assert_eq!(result.bmi, 23.5);
        assert_eq!(result.category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_metric_and_imperial_agree() {
        // 180 cm / 80 kg is roughly 70.87 in / 176.37 lb
        let metric = calculate_bmi(&BmiInput::new(180.0, 80.0, UnitSystem::Metric)).unwrap();
        let imperial =
            calculate_bmi(&BmiInput::new(70.866, 176.37, UnitSystem::Imperial)).unwrap();
        assert!((metric.bmi - imperial.bmi).abs() <= 0.1);
        assert_eq!(metric.category, imperial.category);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4999), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(24.9999), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9999), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obesity);
    }

    #[test]
    fn test_boundaries_through_formula() {
        // At 100 cm the BMI equals the weight in kg
        let at = |kg: f64| calculate_bmi(&BmiInput::new(100.0, kg, UnitSystem::Metric)).unwrap();
        assert_eq!(at(18.5).category, BmiCategory::NormalWeight);
        assert_eq!(at(25.0).category, BmiCategory::Overweight);
        assert_eq!(at(30.0).category, BmiCategory::Obesity);
        assert_eq!(at(17.0).category, BmiCategory::Underweight);
    }

    #[test]
    fn test_classifies_before_rounding() {
        // 24.96 displays as 25.0 but is still below the overweight bound
        let result = calculate_bmi(&BmiInput::new(100.0, 24.96, UnitSystem::Metric)).unwrap();
        assert_eq!(result.bmi, 25.0);
        assert_eq!(result.category, BmiCategory::NormalWeight);
    }

    #[test]
    fn test_incomplete_input_yields_nothing() {
        let cases = [
            BmiInput { height: None, weight: Some(70.0), unit_system: UnitSystem::Metric },
            BmiInput { height: Some(170.0), weight: None, unit_system: UnitSystem::Metric },
            BmiInput::new(0.0, 70.0, UnitSystem::Metric),
            BmiInput::new(170.0, 0.0, UnitSystem::Imperial),
            BmiInput::new(-170.0, 70.0, UnitSystem::Metric),
            BmiInput::new(f64::NAN, 70.0, UnitSystem::Metric),
        ];
        for input in cases {
            assert!(calculate_bmi(&input).is_none(), "expected no result for {:?}", input);
        }
    }

    #[test]
    fn test_unit_system_from_str() {
        assert_eq!(UnitSystem::from_str("Metric"), Some(UnitSystem::Metric));
        assert_eq!(UnitSystem::from_str("imperial"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_str("lbs"), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::from_str("furlongs"), None);
    }

    #[test]
    fn test_calculator_keeps_prior_result_on_incomplete_input() {
        let mut calc = BmiCalculator::new(UnitSystem::Metric);
        calc.set_height("170");
        calc.set_weight("70");
        assert_eq!(calc.calculate().map(|r| r.bmi), Some(24.2));

        calc.set_weight("");
        assert_eq!(calc.calculate().map(|r| r.bmi), Some(24.2));

        calc.set_weight("heavy");
        assert_eq!(calc.calculate().map(|r| r.bmi), Some(24.2));
    }

    #[test]
    fn test_calculator_reset() {
        let mut calc = BmiCalculator::new(UnitSystem::Imperial);
        calc.set_height("67");
        calc.set_weight("150");
        assert!(calc.calculate().is_some());

        calc.reset();
        assert!(calc.result().is_none());
        assert_eq!(calc.input().height, None);
        assert_eq!(calc.unit_system(), UnitSystem::Imperial);
        assert!(calc.calculate().is_none());
    }
}
