//! Entry form validation
//!
//! Turns the raw text of a form submission into a `HealthEntryCreate`.
//! Any bad numeric field rejects the whole submission.

use thiserror::Error;

use crate::models::{parse_timestamp, HealthEntryCreate, Mood};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("date must look like YYYY-MM-DD HH:MM, got {0:?}")]
    InvalidTimestamp(String),
}

/// One form submission, fields as typed
#[derive(Debug, Clone)]
pub struct EntryForm {
    pub timestamp: String,
    pub weight: String,
    pub blood_sugar: String,
    pub sleep_hours: String,
    pub mood: Mood,
    pub notes: String,
    pub height_cm: String,
}

impl EntryForm {
    pub fn validate(&self) -> Result<HealthEntryCreate, FormError> {
        let timestamp = parse_timestamp(&self.timestamp)
            .map_err(|_| FormError::InvalidTimestamp(self.timestamp.clone()))?;

        Ok(HealthEntryCreate {
            timestamp,
            weight: parse_decimal("weight", &self.weight)?,
            blood_sugar: parse_decimal("blood sugar", &self.blood_sugar)?,
            sleep_hours: parse_decimal("sleep hours", &self.sleep_hours)?,
            mood: self.mood,
            notes: self.notes.clone(),
        })
    }

    /// Height to remember, if the field holds a number
    pub fn height_cm(&self) -> Option<f64> {
        parse_decimal("height", &self.height_cm).ok()
    }
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, FormError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormError::NotANumber {
            field,
            value: value.to_string(),
        })
}
