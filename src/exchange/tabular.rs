//! CSV exchange
//!
//! Header names are the localized (German) labels of the entry form:
//! Datum, Gewicht, Zucker, Schlaf, Befinden, Notizen. The store id is never
//! exported; extra columns on import (an `ID` column, say) are ignored.
//!
//! Import is all-or-nothing: the first bad row fails the whole file.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ExchangeError, ExchangeResult};
use crate::models::{format_timestamp, parse_timestamp, HealthEntry, HealthEntryCreate, Mood};

pub const CSV_HEADERS: [&str; 6] = ["Datum", "Gewicht", "Zucker", "Schlaf", "Befinden", "Notizen"];

/// A row in the CSV file
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Datum")]
    date: String,
    #[serde(rename = "Gewicht")]
    weight: f64,
    #[serde(rename = "Zucker")]
    blood_sugar: f64,
    #[serde(rename = "Schlaf")]
    sleep_hours: f64,
    #[serde(rename = "Befinden")]
    mood: String,
    #[serde(rename = "Notizen", default)]
    notes: String,
}

impl From<&HealthEntry> for CsvRow {
    fn from(entry: &HealthEntry) -> Self {
        CsvRow {
            date: format_timestamp(&entry.timestamp),
            weight: entry.weight,
            blood_sugar: entry.blood_sugar,
            sleep_hours: entry.sleep_hours,
            mood: entry.mood.as_str().to_string(),
            notes: entry.notes.clone(),
        }
    }
}

impl CsvRow {
    fn into_entry(self, line: u64) -> ExchangeResult<HealthEntryCreate> {
        let timestamp = parse_timestamp(&self.date).map_err(|e| ExchangeError::InvalidRow {
            line,
            message: format!("bad date {:?}: {}", self.date, e),
        })?;
        let mood = self.mood.parse::<Mood>().map_err(|e| ExchangeError::InvalidRow {
            line,
            message: e.to_string(),
        })?;

        for (column, value) in [
            ("Gewicht", self.weight),
            ("Zucker", self.blood_sugar),
            ("Schlaf", self.sleep_hours),
        ] {
            if !value.is_finite() {
                return Err(ExchangeError::InvalidRow {
                    line,
                    message: format!("{} must be a finite number, got {}", column, value),
                });
            }
        }

        Ok(HealthEntryCreate {
            timestamp,
            weight: self.weight,
            blood_sugar: self.blood_sugar,
            sleep_hours: self.sleep_hours,
            mood,
            notes: self.notes,
        })
    }
}

/// Write the header and one line per entry
pub fn export_tabular<W: Write>(writer: W, entries: &[HealthEntry]) -> ExchangeResult<()> {
    // Header written by hand so an empty export still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(CSV_HEADERS)?;
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} entries to CSV", entries.len());
    Ok(())
}

pub fn export_tabular_path(path: &Path, entries: &[HealthEntry]) -> ExchangeResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    export_tabular(file, entries)
}

/// Parse every row into an entry. Nothing is inserted.
pub fn import_tabular<R: Read>(reader: R) -> ExchangeResult<Vec<HealthEntryCreate>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for required in CSV_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(ExchangeError::MissingColumn(required.to_string()));
        }
    }

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| ExchangeError::InvalidRow {
                line,
                message: e.to_string(),
            })?;
        entries.push(row.into_entry(line)?);
    }

    tracing::info!("Parsed {} entries from CSV", entries.len());
    Ok(entries)
}

pub fn import_tabular_path(path: &Path) -> ExchangeResult<Vec<HealthEntryCreate>> {
    let file = File::open(path)?;
    import_tabular(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, ts: &str, weight: f64, notes: &str) -> HealthEntry {
        HealthEntry {
            id,
            timestamp: parse_timestamp(ts).unwrap(),
            weight,
            blood_sugar: 104.5,
            sleep_hours: 7.0,
            mood: Mood::Poor,
            notes: notes.to_string(),
        }
    }

    fn export_to_string(entries: &[HealthEntry]) -> String {
        let mut buf = Vec::new();
        export_tabular(&mut buf, entries).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_export_layout() {
        let text = export_to_string(&[entry(7, "2024-01-02 08:00", 80.0, "ok")]);
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen");
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-01-02 08:00,80"));
        assert!(row.ends_with(",Schlecht,ok"));
        assert_eq!(row.split(',').count(), CSV_HEADERS.len());
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let text = export_to_string(&[]);
        assert_eq!(text.trim_end(), CSV_HEADERS.join(","));
        assert!(import_tabular(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_export_then_import_preserves_values() {
        let entries = vec![
            entry(1, "2024-01-01 07:00", 79.3, "line one\nline two"),
            entry(2, "2024-01-02 08:30", 80.0, "comma, quote \" inside"),
            entry(3, "2024-01-03 21:15", 0.1 + 0.2, ""),
        ];

        let text = export_to_string(&entries);
        let imported = import_tabular(text.as_bytes()).unwrap();

        assert_eq!(imported.len(), entries.len());
        for (original, back) in entries.iter().zip(&imported) {
            assert_eq!(&original.to_create(), back);
        }
    }

    #[test]
    fn test_import_ignores_id_column_and_column_order() {
        let text = "ID,Notizen,Befinden,Schlaf,Zucker,Gewicht,Datum\n\
                    12,evening,Gut,8,99,70.5,2024-02-03 19:00\n";

        let imported = import_tabular(text.as_bytes()).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].weight, 70.5);
        assert_eq!(imported[0].mood, Mood::Good);
        assert_eq!(imported[0].notes, "evening");
    }

    #[test]
    fn test_missing_column_fails() {
        let text = "Datum,Gewicht,Zucker,Schlaf,Befinden\n2024-02-03 19:00,70,99,8,Gut\n";
        match import_tabular(text.as_bytes()) {
            Err(ExchangeError::MissingColumn(name)) => assert_eq!(name, "Notizen"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_one_bad_row_fails_whole_file() {
        let text = "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n\
                    2024-02-03 19:00,70,99,8,Gut,\n\
                    2024-02-04 19:00,seventy,99,8,Gut,\n";

        match import_tabular(text.as_bytes()) {
            Err(ExchangeError::InvalidRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mood_fails() {
        let text = "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n\
                    2024-02-03 19:00,70,99,8,Prima,\n";
        assert!(matches!(
            import_tabular(text.as_bytes()),
            Err(ExchangeError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_numbers_fail() {
        for (row, column) in [
            ("2024-02-03 19:00,inf,99,8,Gut,", "Gewicht"),
            ("2024-02-03 19:00,NaN,99,8,Gut,", "Gewicht"),
            ("2024-02-03 19:00,70,-inf,8,Gut,", "Zucker"),
            ("2024-02-03 19:00,70,99,NaN,Gut,", "Schlaf"),
        ] {
            let text = format!("Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n{}\n", row);
            match import_tabular(text.as_bytes()) {
                Err(ExchangeError::InvalidRow { line, message }) => {
                    assert_eq!(line, 2);
                    assert!(message.contains(column), "{}", message);
                }
                other => panic!("expected InvalidRow for {:?}, got {:?}", row, other),
            }
        }
    }

    #[test]
    fn test_bad_date_fails() {
        let text = "Datum,Gewicht,Zucker,Schlaf,Befinden,Notizen\n\
                    03.02.2024,70,99,8,Gut,\n";
        assert!(matches!(
            import_tabular(text.as_bytes()),
            Err(ExchangeError::InvalidRow { .. })
        ));
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("entries.csv");
        let entries = vec![entry(1, "2024-01-01 07:00", 79.3, "x")];

        export_tabular_path(&path, &entries).unwrap();
        let imported = import_tabular_path(&path).unwrap();
        assert_eq!(imported, vec![entries[0].to_create()]);
    }
}
