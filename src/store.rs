// src/store.rs
//
// Snapshot Store: one JSON file per run date, a `latest.json` alias, and an
// `index.json` listing every dated file present, newest first.
//
// The index is never patched: after each write it is regenerated from a scan
// of the directory, so it always reflects exactly the dated files on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::consts::{INDEX_FILE, LATEST_FILE, SEED_FILE};
use crate::core::fields::ISO;
use crate::error::StoreError;
use crate::file::{ensure_directory, read_json, write_json_atomic};
use crate::model::RunSnapshot;

/// `{ "dates": ["YYYY-MM-DD", ...] }`, descending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateIndex {
    pub dates: Vec<NaiveDate>,
}

/// Paths written by one `SnapshotStore::write`.
#[derive(Clone, Debug)]
pub struct Written {
    pub dated: PathBuf,
    pub latest: PathBuf,
    pub index: PathBuf,
}

impl Written {
    pub fn paths(&self) -> [&Path; 3] {
        [&self.dated, &self.latest, &self.index]
    }
}

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dated_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(join!(date.format(ISO).to_string(), ".json"))
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Persist a run: dated file, then the latest alias, then the index.
    /// A same-day rerun overwrites that day's file; other dates are never touched.
    pub fn write(&self, snap: &RunSnapshot) -> Result<Written, StoreError> {
        ensure_directory(&self.dir)?;

        let dated = self.dated_path(snap.date);
        write_json_atomic(&dated, snap)?;
        tracing::debug!("Store: wrote {}", dated.display());

        let latest = self.latest_path();
        write_json_atomic(&latest, snap)?;

        self.rebuild_index()?;
        Ok(Written { dated, latest, index: self.index_path() })
    }

    /// Dates of every `YYYY-MM-DD.json` file in the directory, newest first.
    /// Alias files and anything not shaped like a date are ignored.
    pub fn scan_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let mut dates = Vec::new();
        if !self.dir.exists() {
            return Ok(dates);
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if !path.is_file() { continue; }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else { continue };
            if matches!(name, LATEST_FILE | SEED_FILE | INDEX_FILE) { continue; }
            if let Some(d) = date_from_file_name(name) {
                dates.push(d);
            }
        }
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        Ok(dates)
    }

    /// Regenerate `index.json` from the files on disk.
    pub fn rebuild_index(&self) -> Result<Vec<NaiveDate>, StoreError> {
        ensure_directory(&self.dir)?;
        let dates = self.scan_dates()?;
        write_json_atomic(&self.index_path(), &DateIndex { dates: dates.clone() })?;
        tracing::debug!("Store: index rebuilt with {} dates", dates.len());
        Ok(dates)
    }

    pub fn load_latest(&self) -> Result<RunSnapshot, StoreError> {
        read_json(&self.latest_path())
    }

    pub fn load_index(&self) -> Result<DateIndex, StoreError> {
        read_json(&self.index_path())
    }
}

/// `2025-01-31.json` -> 2025-01-31. Shape is checked strictly before parsing.
fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    let b = stem.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter().enumerate().all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(stem, ISO).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_shape() {
        assert_eq!(date_from_file_name("2025-01-31.json"), NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(date_from_file_name("2025-1-31.json"), None);
        assert_eq!(date_from_file_name("2025-02-30.json"), None);
        assert_eq!(date_from_file_name("2025-01-31.json.bak"), None);
        assert_eq!(date_from_file_name("latest.json"), None);
        assert_eq!(date_from_file_name("+2025-01-3.json"), None);
    }
}
