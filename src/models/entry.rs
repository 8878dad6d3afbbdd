//! Health entry model
//!
//! One row per logged measurement occasion. Timestamps are real date-times in
//! memory and only become "YYYY-MM-DD HH:MM" text at the storage and exchange
//! boundaries, which is what keeps text order equal to chronological order.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::mood::Mood;
use crate::db::{DbError, DbResult};

/// Text format of a timestamp in the store, CSV and PDF
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a timestamp in the fixed "YYYY-MM-DD HH:MM" format
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter keeping the fixed text format in JSON output
pub mod timestamp_text {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

/// A stored health entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: i64,
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
    pub weight: f64,
    pub blood_sugar: f64,
    pub sleep_hours: f64,
    pub mood: Mood,
    pub notes: String,
}

/// Data for creating a new health entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntryCreate {
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
    pub weight: f64,
    pub blood_sugar: f64,
    pub sleep_hours: f64,
    pub mood: Mood,
    pub notes: String,
}

impl HealthEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let timestamp_text: String = row.get("timestamp")?;
        let timestamp = parse_timestamp(&timestamp_text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
        })?;

        let mood_text: String = row.get("mood")?;
        let mood = mood_text.parse::<Mood>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            timestamp,
            weight: row.get("weight")?,
            blood_sugar: row.get("blood_sugar")?,
            sleep_hours: row.get("sleep_hours")?,
            mood,
            notes: row.get("notes")?,
        })
    }

    /// Insert a new entry; the store assigns the id
    pub fn create(conn: &Connection, data: &HealthEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO health_entry (timestamp, weight, blood_sugar, sleep_hours, mood, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                format_timestamp(&data.timestamp),
                data.weight,
                data.blood_sugar,
                data.sleep_hours,
                data.mood.as_str(),
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!(id, timestamp = %format_timestamp(&data.timestamp), "inserted health entry");

        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_entry WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List every entry, oldest first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_entry ORDER BY timestamp, id")?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = entries.len(), "loaded health entries");
        Ok(entries)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM health_entry", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Calendar date of the measurement
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The entry's field values without its id
    pub fn to_create(&self) -> HealthEntryCreate {
        HealthEntryCreate {
            timestamp: self.timestamp,
            weight: self.weight,
            blood_sugar: self.blood_sugar,
            sleep_hours: self.sleep_hours,
            mood: self.mood,
            notes: self.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample(ts: &str, weight: f64) -> HealthEntryCreate {
        HealthEntryCreate {
            timestamp: parse_timestamp(ts).unwrap(),
            weight,
            blood_sugar: 98.5,
            sleep_hours: 7.25,
            mood: Mood::Fair,
            notes: "after breakfast, walked 3 km".to_string(),
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let conn = setup();
        let first = HealthEntry::create(&conn, &sample("2024-03-01 08:00", 80.0)).unwrap();
        let second = HealthEntry::create(&conn, &sample("2024-02-01 08:00", 81.0)).unwrap();

        assert!(second.id > first.id);
        assert_eq!(HealthEntry::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_inserted_entry_reads_back_equal() {
        let conn = setup();
        let data = sample("2024-03-01 21:45", 72.4);
        let created = HealthEntry::create(&conn, &data).unwrap();

        let all = HealthEntry::list_all(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].to_create(), data);
    }

    #[test]
    fn test_list_all_orders_by_timestamp() {
        let conn = setup();
        for ts in [
            "2024-01-10 09:00",
            "2023-12-31 23:59",
            "2024-01-02 07:30",
            "2024-01-02 07:05",
        ] {
            HealthEntry::create(&conn, &sample(ts, 75.0)).unwrap();
        }

        let stamps: Vec<String> = HealthEntry::list_all(&conn)
            .unwrap()
            .iter()
            .map(|e| format_timestamp(&e.timestamp))
            .collect();

        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
        assert_eq!(stamps[0], "2023-12-31 23:59");
    }

    #[test]
    fn test_get_by_id_missing() {
        let conn = setup();
        assert!(HealthEntry::get_by_id(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_unknown_mood_in_store_is_reported() {
        let conn = setup();
        conn.execute(
            "INSERT INTO health_entry (timestamp, weight, blood_sugar, sleep_hours, mood, notes)
             VALUES ('2024-01-01 08:00', 70.0, 95.0, 7.5, 'ecstatic', '')",
            [],
        )
        .unwrap();

        assert!(HealthEntry::list_all(&conn).is_err());
    }

    #[test]
    fn test_timestamp_text_format() {
        let ts = parse_timestamp("2024-05-06 07:08").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-05-06 07:08");
        assert!(parse_timestamp("2024-05-06").is_err());
        assert!(parse_timestamp("06.05.2024 07:08").is_err());
    }
}
