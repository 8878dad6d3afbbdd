//! Latest-day averages
//!
//! Mean of the numeric fields over the most recent calendar date present.
//! Entries from any other day are ignored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::HealthEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub count: usize,
    pub weight: f64,
    pub blood_sugar: f64,
    pub sleep_hours: f64,
}

/// Average the entries of the latest date; `None` for an empty slice
pub fn latest_day_average(entries: &[HealthEntry]) -> Option<DailyAverage> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&HealthEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date()).or_default().push(entry);
    }

    let (date, day) = by_date.into_iter().next_back()?;
    let n = day.len() as f64;

    Some(DailyAverage {
        date,
        count: day.len(),
        weight: day.iter().map(|e| e.weight).sum::<f64>() / n,
        blood_sugar: day.iter().map(|e| e.blood_sugar).sum::<f64>() / n,
        sleep_hours: day.iter().map(|e| e.sleep_hours).sum::<f64>() / n,
    })
}
