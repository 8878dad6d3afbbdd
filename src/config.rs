//! File locations
//!
//! Everything lives under one data directory:
//! `--data-dir`, else `$HEALTHLOG_DATA_DIR`, else the platform data dir.
//! `$HEALTHLOG_DATABASE_PATH` can point the store somewhere else entirely.

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "HEALTHLOG_DATA_DIR";
pub const DATABASE_PATH_ENV: &str = "HEALTHLOG_DATABASE_PATH";

const DATABASE_FILE: &str = "healthlog.db";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub settings: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the command line override and the environment
    pub fn resolve(data_dir_override: Option<PathBuf>) -> Self {
        let data_dir = data_dir_override.unwrap_or_else(default_data_dir);
        let mut paths = Self::in_dir(&data_dir);

        if let Ok(db_path) = std::env::var(DATABASE_PATH_ENV) {
            if !db_path.is_empty() {
                paths.database = PathBuf::from(db_path);
            }
        }

        tracing::debug!(?paths, "resolved file locations");
        paths
    }

    /// All files rooted in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            database: dir.join(DATABASE_FILE),
            settings: dir.join(SETTINGS_FILE),
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    dirs::data_local_dir()
        .map(|base| base.join("healthlog"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
