//! Mood model
//!
//! The closed set of moods offered by the entry form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the user felt at the time of the measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mood {0:?} (expected Gut, Mittel or Schlecht)")]
pub struct ParseMoodError(pub String);

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Good, Mood::Fair, Mood::Poor];

    /// Label stored in the database and written to CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Good => "Gut",
            Mood::Fair => "Mittel",
            Mood::Poor => "Schlecht",
        }
    }
}

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gut" | "good" => Ok(Mood::Good),
            "mittel" | "fair" | "ok" => Ok(Mood::Fair),
            "schlecht" | "poor" | "bad" => Ok(Mood::Poor),
            _ => Err(ParseMoodError(s.to_string())),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
