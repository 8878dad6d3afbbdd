//! Entry tools
//!
//! Save a form, list entries for the table, latest-day averages and the live
//! BMI label.

use std::path::Path;

use serde::Serialize;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::health::{self, display_bmi, Bmi, DailyAverage, EntryForm};
use crate::models::{HealthEntry, HealthEntryCreate};
use crate::settings::Settings;

/// Response for save_entry
#[derive(Debug, Serialize)]
pub struct SaveEntryResponse {
    pub entry: HealthEntry,
    pub bmi: Option<Bmi>,
    pub bmi_display: String,
    /// Height written to the settings file by this save, if any
    pub height_saved: Option<f64>,
}

/// One table row
#[derive(Debug, Serialize)]
pub struct EntryRow {
    #[serde(flatten)]
    pub entry: HealthEntry,
    pub bmi: Option<Bmi>,
}

/// Response for list_entries
#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<EntryRow>,
    pub total: usize,
    pub height_cm: Option<f64>,
}

/// Response for bmi_preview
#[derive(Debug, Serialize)]
pub struct BmiPreview {
    pub bmi: Option<Bmi>,
    pub display: String,
}

/// Validate the form and store one entry.
///
/// A rejected form stores nothing. On success a parseable height is
/// remembered in `settings` and written to `settings_path`.
pub fn save_entry(
    db: &Database,
    settings: &mut Settings,
    settings_path: &Path,
    form: &EntryForm,
) -> Result<SaveEntryResponse> {
    let data: HealthEntryCreate = form.validate().map_err(|e| {
        tracing::warn!("rejected entry form: {}", e);
        Error::Validation(e)
    })?;

    let entry = db.with_conn(|conn| HealthEntry::create(conn, &data))?;

    let height_saved = form.height_cm();
    if let Some(height) = height_saved {
        settings.height_cm = Some(height);
        settings.save_to(settings_path)?;
    }

    let bmi = settings.height_cm.and_then(|h| Bmi::new(entry.weight, h));

    Ok(SaveEntryResponse {
        bmi_display: display_bmi(bmi.as_ref()),
        entry,
        bmi,
        height_saved,
    })
}

/// Every entry for the table, oldest first, with BMI where height is known
pub fn list_entries(db: &Database, settings: &Settings) -> Result<ListEntriesResponse> {
    let entries = db.with_conn(HealthEntry::list_all)?;

    let rows: Vec<EntryRow> = entries
        .into_iter()
        .map(|entry| EntryRow {
            bmi: settings.height_cm.and_then(|h| Bmi::new(entry.weight, h)),
            entry,
        })
        .collect();

    Ok(ListEntriesResponse {
        total: rows.len(),
        entries: rows,
        height_cm: settings.height_cm,
    })
}

/// Averages over the most recent day; `None` when the store is empty
pub fn daily_average(db: &Database) -> Result<Option<DailyAverage>> {
    let entries = db.with_conn(HealthEntry::list_all)?;
    Ok(health::latest_day_average(&entries))
}

/// BMI label for the weight and height fields as currently typed
pub fn bmi_preview(weight: &str, height_cm: &str) -> BmiPreview {
    let bmi = health::parse_bmi(weight, height_cm);
    BmiPreview {
        display: display_bmi(bmi.as_ref()),
        bmi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::BmiClass;
    use crate::models::Mood;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("healthlog.db")).unwrap();
        db.initialize().unwrap();
        (dir, db)
    }

    fn form(ts: &str, weight: &str) -> EntryForm {
        EntryForm {
            timestamp: ts.to_string(),
            weight: weight.to_string(),
            blood_sugar: "100".to_string(),
            sleep_hours: "7".to_string(),
            mood: Mood::Good,
            notes: "note".to_string(),
            height_cm: String::new(),
        }
    }

    #[test]
    fn test_save_then_list() {
        let (dir, db) = setup();
        let settings_path = dir.path().join("settings.json");
        let mut settings = Settings::default();

        let saved = save_entry(
            &db,
            &mut settings,
            &settings_path,
            &form("2024-01-02 08:00", "80"),
        )
        .unwrap();
        assert_eq!(saved.entry.weight, 80.0);
        assert_eq!(saved.bmi_display, "-");
        assert!(!settings_path.exists());

        let listed = list_entries(&db, &settings).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.entries[0].entry, saved.entry);
    }

    #[test]
    fn test_invalid_weight_stores_nothing() {
        let (dir, db) = setup();
        let settings_path = dir.path().join("settings.json");
        let mut settings = Settings::default();

        save_entry(&db, &mut settings, &settings_path, &form("2024-01-01 08:00", "79")).unwrap();

        let mut bad = form("2024-01-02 08:00", "eighty");
        bad.height_cm = "180".to_string();
        let err = save_entry(&db, &mut settings, &settings_path, &bad).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let listed = list_entries(&db, &settings).unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.entries[0].entry.weight, 79.0);
        assert_eq!(settings.height_cm, None);
    }

    #[test]
    fn test_height_is_persisted_on_save() {
        let (dir, db) = setup();
        let settings_path = dir.path().join("settings.json");
        let mut settings = Settings::default();

        let mut f = form("2024-01-02 08:00", "70");
        f.height_cm = "175".to_string();
        let saved = save_entry(&db, &mut settings, &settings_path, &f).unwrap();

        assert_eq!(saved.height_saved, Some(175.0));
        assert_eq!(saved.bmi.unwrap().class, BmiClass::Normal);
        assert_eq!(Settings::load_from(&settings_path).unwrap().height_cm, Some(175.0));

        let listed = list_entries(&db, &settings).unwrap();
        assert!(listed.entries[0].bmi.is_some());
    }

    #[test]
    fn test_daily_average() {
        let (dir, db) = setup();
        let settings_path = dir.path().join("settings.json");
        let mut settings = Settings::default();

        assert!(daily_average(&db).unwrap().is_none());

        for (ts, w) in [
            ("2024-01-02 08:00", "80"),
            ("2024-01-02 20:00", "82"),
            ("2024-01-01 08:00", "79"),
        ] {
            save_entry(&db, &mut settings, &settings_path, &form(ts, w)).unwrap();
        }

        let avg = daily_average(&db).unwrap().unwrap();
        assert_eq!(avg.date.to_string(), "2024-01-02");
        assert_eq!(avg.count, 2);
        assert!((avg.weight - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_preview() {
        assert_eq!(bmi_preview("70", "175").display, "22.86 (Normal)");
        assert_eq!(bmi_preview("70", "").display, "-");
        assert!(bmi_preview("", "175").bmi.is_none());
    }
}
