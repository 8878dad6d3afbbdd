//! Exchange tools
//!
//! CSV export/import, PDF export and chart rendering against the store.

use std::path::Path;

use serde::Serialize;

use crate::chart::{render_trend_chart, TrendSeries};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::exchange;
use crate::models::HealthEntry;
use crate::settings::Settings;

/// Chart size when embedded in the PDF
const PDF_CHART_SIZE: (u32, u32) = (1000, 700);

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub file_path: String,
    pub entries: usize,
    pub pages: Option<usize>,
    pub chart_included: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub file_path: String,
    pub imported: usize,
    pub total_after: i64,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub file_path: String,
    pub entries: usize,
    pub has_bmi: bool,
}

/// Write every entry to a CSV file
pub fn export_csv(db: &Database, path: &Path) -> Result<ExportResponse> {
    let entries = db.with_conn(HealthEntry::list_all)?;
    exchange::export_tabular_path(path, &entries)?;

    Ok(ExportResponse {
        file_path: path.display().to_string(),
        entries: entries.len(),
        pages: None,
        chart_included: false,
    })
}

/// Parse a CSV file and insert every row, or nothing if any row is bad
pub fn import_csv(db: &Database, path: &Path) -> Result<ImportResponse> {
    let rows = exchange::import_tabular_path(path).map_err(|e| {
        tracing::warn!("CSV import of {:?} rejected: {}", path, e);
        e
    })?;

    let total_after = db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        for row in &rows {
            HealthEntry::create(&tx, row)?;
        }
        let total = HealthEntry::count(&tx)?;
        tx.commit()?;
        Ok(total)
    })?;

    tracing::info!("Imported {} entries from {:?}", rows.len(), path);

    Ok(ImportResponse {
        file_path: path.display().to_string(),
        imported: rows.len(),
        total_after,
    })
}

/// Write the PDF snapshot, optionally with a chart page.
///
/// A chart that fails to render is left out rather than failing the export.
pub fn export_pdf(
    db: &Database,
    settings: &Settings,
    path: &Path,
    with_chart: bool,
) -> Result<ExportResponse> {
    let entries = db.with_conn(HealthEntry::list_all)?;

    let chart_png = if with_chart {
        let series = TrendSeries::from_entries(&entries, settings.height_cm);
        match render_trend_chart(&series, PDF_CHART_SIZE.0, PDF_CHART_SIZE.1) {
            Ok(png) => Some(png),
            Err(e) => {
                tracing::warn!("chart left out of PDF: {}", e);
                None
            }
        }
    } else {
        None
    };

    let pages = exchange::export_document(path, &entries, chart_png.as_deref())?;

    Ok(ExportResponse {
        file_path: path.display().to_string(),
        entries: entries.len(),
        pages: Some(pages),
        chart_included: chart_png.is_some(),
    })
}

/// Render the three-panel trend chart to a PNG file
pub fn render_chart(
    db: &Database,
    settings: &Settings,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<ChartResponse> {
    let entries = db.with_conn(HealthEntry::list_all)?;
    let series = TrendSeries::from_entries(&entries, settings.height_cm);

    let png = render_trend_chart(&series, width, height).map_err(Error::Chart)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, png)?;
    tracing::info!("Wrote chart of {} entries to {:?}", series.len(), path);

    Ok(ChartResponse {
        file_path: path.display().to_string(),
        entries: series.len(),
        has_bmi: series.has_bmi(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeError;
    use crate::models::{parse_timestamp, HealthEntryCreate, Mood};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("healthlog.db")).unwrap();
        db.initialize().unwrap();
        (dir, db)
    }

    fn seed(db: &Database, rows: &[(&str, f64)]) {
        db.with_conn(|conn| {
            for (ts, weight) in rows {
                HealthEntry::create(
                    conn,
                    &HealthEntryCreate {
                        timestamp: parse_timestamp(ts).unwrap(),
                        weight: *weight,
                        blood_sugar: 97.0,
                        sleep_hours: 6.75,
                        mood: Mood::Fair,
                        notes: format!("weighed {}", weight),
                    },
                )?;
            }
            Ok(())
        })
        .unwrap();
    }

    fn all(db: &Database) -> Vec<HealthEntry> {
        db.with_conn(HealthEntry::list_all).unwrap()
    }

    #[test]
    fn test_csv_round_trip_into_fresh_store() {
        let (dir, db) = setup();
        seed(
            &db,
            &[
                ("2024-01-03 08:00", 80.2),
                ("2024-01-01 08:00", 81.0),
                ("2024-01-02 08:00", 70.0),
            ],
        );
        let csv_path = dir.path().join("export.csv");

        let exported = export_csv(&db, &csv_path).unwrap();
        assert_eq!(exported.entries, 3);

        let other = Database::new(dir.path().join("other.db")).unwrap();
        other.initialize().unwrap();
        let imported = import_csv(&other, &csv_path).unwrap();
        assert_eq!(imported.imported, 3);
        assert_eq!(imported.total_after, 3);

        let originals: Vec<HealthEntryCreate> =
            all(&db).iter().map(HealthEntry::to_create).collect();
        let copies: Vec<HealthEntryCreate> =
            all(&other).iter().map(HealthEntry::to_create).collect();
        assert_eq!(originals, copies);
    }

    #[test]
    fn test_import_missing_column_inserts_nothing() {
        let (dir, db) = setup();
        seed(&db, &[("2024-01-01 08:00", 80.0)]);
        let csv_path = dir.path().join("bad.csv");
        std::fs::write(
            &csv_path,
            "Datum,Gewicht,Zucker,Befinden,Notizen\n2024-01-02 08:00,80,100,Gut,\n",
        )
        .unwrap();

        let err = import_csv(&db, &csv_path).unwrap_err();
        assert!(matches!(
            err,
            Error::Exchange(ExchangeError::MissingColumn(ref c)) if c == "Schlaf"
        ));
        assert_eq!(all(&db).len(), 1);
    }

    #[test]
    fn test_import_with_bad_row_inserts_nothing() {
        let (dir, db) = setup();
        let csv_path = dir.path().join("partial.csv");
        std::fs::write(
            &csv_path,
            "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n\
             2024-01-02 08:00,80,100,7,Gut,\n\
             2024-01-03 08:00,80,lots,7,Gut,\n",
        )
        .unwrap();

        assert!(import_csv(&db, &csv_path).is_err());
        assert!(all(&db).is_empty());
    }

    #[test]
    fn test_import_non_finite_row_inserts_nothing() {
        let (dir, db) = setup();
        seed(&db, &[("2024-01-01 08:00", 80.0)]);

        for weight in ["inf", "NaN"] {
            let csv_path = dir.path().join(format!("{}.csv", weight));
            let text = format!(
                "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n\
                 2024-01-02 08:00,80,100,7,Gut,\n\
                 2024-01-03 08:00,{},100,7,Gut,\n",
                weight
            );
            std::fs::write(&csv_path, text).unwrap();

            let err = import_csv(&db, &csv_path).unwrap_err();
            assert!(matches!(
                err,
                Error::Exchange(ExchangeError::InvalidRow { line: 3, .. })
            ));
            assert_eq!(all(&db).len(), 1);
        }
    }

    #[test]
    fn test_export_pdf() {
        let (dir, db) = setup();
        seed(&db, &[("2024-01-01 08:00", 80.0)]);
        let pdf_path = dir.path().join("report.pdf");

        let response = export_pdf(&db, &Settings::default(), &pdf_path, false).unwrap();
        assert_eq!(response.entries, 1);
        assert_eq!(response.pages, Some(1));
        assert!(!response.chart_included);
        assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_pdf_with_chart_always_writes_file() {
        let (dir, db) = setup();
        seed(&db, &[("2024-01-01 08:00", 80.0), ("2024-01-02 08:00", 79.5)]);
        let pdf_path = dir.path().join("report.pdf");
        let settings = Settings { height_cm: Some(180.0) };

        export_pdf(&db, &settings, &pdf_path, true).unwrap();
        assert!(pdf_path.exists());
    }
}
