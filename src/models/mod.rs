//! Data models
//!
//! Rust structs representing database entities.

mod entry;
mod mood;

pub use entry::{
    format_timestamp, parse_timestamp, timestamp_text, HealthEntry, HealthEntryCreate,
    TIMESTAMP_FORMAT,
};
pub use mood::{Mood, ParseMoodError};
