//! Body Mass Index
//!
//! BMI = weight (kg) / height (m)^2, classified on the six-band WHO table.

use std::fmt;

use serde::Serialize;

/// Shaded "ideal" band on the BMI chart panel
pub const IDEAL_BMI_RANGE: (f64, f64) = (18.5, 24.9);

/// Shown wherever a BMI cannot be computed
pub const BMI_PLACEHOLDER: &str = "-";

/// BMI classification. Lower bounds inclusive, upper bounds exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    ObeseClass3,
}

impl BmiClass {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiClass::Underweight
        } else if bmi < 25.0 {
            BmiClass::Normal
        } else if bmi < 30.0 {
            BmiClass::Overweight
        } else if bmi < 35.0 {
            BmiClass::ObeseClass1
        } else if bmi < 40.0 {
            BmiClass::ObeseClass2
        } else {
            BmiClass::ObeseClass3
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiClass::Underweight => "Underweight",
            BmiClass::Normal => "Normal",
            BmiClass::Overweight => "Overweight",
            BmiClass::ObeseClass1 => "Obese (class I)",
            BmiClass::ObeseClass2 => "Obese (class II)",
            BmiClass::ObeseClass3 => "Obese (class III)",
        }
    }

    /// BMI of 30 or more, whatever the class
    pub fn is_obese(&self) -> bool {
        matches!(
            self,
            BmiClass::ObeseClass1 | BmiClass::ObeseClass2 | BmiClass::ObeseClass3
        )
    }
}

/// A computed BMI with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bmi {
    pub value: f64,
    pub class: BmiClass,
}

impl Bmi {
    pub fn new(weight_kg: f64, height_cm: f64) -> Option<Self> {
        calculate_bmi(weight_kg, height_cm).map(|value| Self {
            value,
            class: BmiClass::from_bmi(value),
        })
    }
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.value, self.class.label())
    }
}

/// Compute BMI; `None` when height is not positive or an input is not finite
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// BMI from raw form text
pub fn parse_bmi(weight: &str, height_cm: &str) -> Option<Bmi> {
    let weight = weight.trim().parse::<f64>().ok()?;
    let height_cm = height_cm.trim().parse::<f64>().ok()?;
    Bmi::new(weight, height_cm)
}

/// Display text for an optional BMI
pub fn display_bmi(bmi: Option<&Bmi>) -> String {
    bmi.map(Bmi::to_string)
        .unwrap_or_else(|| BMI_PLACEHOLDER.to_string())
}
