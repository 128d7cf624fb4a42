// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Inspection history stored as a JSON array

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{AinspectError, Result};

/// Human-readable timestamp layout, e.g. "October 19, 2026 03:04 PM"
pub const TIMESTAMP_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Verdict recorded for an inspected image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Authenticity {
    Real,
    Fake,
    Error,
}

impl Authenticity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authenticity::Real => "Real",
            Authenticity::Fake => "Fake",
            Authenticity::Error => "Error",
        }
    }
}

impl fmt::Display for Authenticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inspection in history
///
/// Older history files only carry the file name and date, so the verdict
/// columns are optional when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Date")]
    pub timestamp: String,
    #[serde(rename = "Authenticity", default, skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<Authenticity>,
    #[serde(rename = "Confidence", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

/// Append-only history of inspections
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by the JSON file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a record, rewriting the whole file
    ///
    /// Unreadable or corrupt content is treated as an empty history. Entries
    /// this version cannot interpret are written back untouched.
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let mut entries = self.read_raw();
        entries.push(serde_json::to_value(record)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json).map_err(|e| self.write_error(e))?;

        debug!("Appended {} to {:?} ({} entries)", record.file_name, self.path, entries.len());
        Ok(())
    }

    /// Read all history records in append order
    ///
    /// Never fails: a missing or malformed file yields an empty history.
    pub fn load_all(&self) -> Vec<HistoryRecord> {
        if !self.path.exists() {
            return Vec::new();
        }

        match fs::read(&self.path) {
            Ok(bytes) => parse_records(&bytes),
            Err(e) => {
                warn!("Failed to read history {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    /// Get the most recent N records (newest first)
    pub fn get_recent(&self, count: usize) -> Vec<HistoryRecord> {
        let mut records = self.load_all();
        records.reverse();
        records.truncate(count);
        records
    }

    /// Get history file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Vec<serde_json::Value> {
        if !self.path.exists() {
            return Vec::new();
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read history {:?}: {}, starting fresh", self.path, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(serde_json::Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("History {:?} is not a JSON array, starting fresh", self.path);
                Vec::new()
            }
            Err(e) => {
                warn!("History {:?} is corrupt ({}), starting fresh", self.path, e);
                Vec::new()
            }
        }
    }

    fn write_error(&self, e: std::io::Error) -> AinspectError {
        AinspectError::History(format!("Cannot write {}: {}", self.path.display(), e))
    }
}

/// Parse history file content, skipping entries that are not records
pub fn parse_records(bytes: &[u8]) -> Vec<HistoryRecord> {
    let entries = match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("History content is not a JSON array");
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to parse history: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Failed to parse history entry: {}", e);
                None
            }
        })
        .collect()
}

/// Format the current local time for a history record
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, authenticity: Authenticity, confidence: &str) -> HistoryRecord {
        HistoryRecord {
            file_name: name.to_string(),
            timestamp: "October 19, 2026 03:04 PM".to_string(),
            authenticity: Some(authenticity),
            confidence: Some(confidence.to_string()),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_append_to_missing_file() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.json"));
        let rec = record("cat.jpg", Authenticity::Real, "85.81%");

        store.append(&rec).unwrap();

        assert_eq!(store.load_all(), vec![rec]);
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let first = record("cat.jpg", Authenticity::Real, "85.81%");
        let second = record("cat.jpg", Authenticity::Fake, "99.10%");
        let third = record("bad.txt", Authenticity::Error, "Cannot decode image: unsupported");

        store.append(&first).unwrap();
        store.append(&second).unwrap();
        store.append(&third).unwrap();

        assert_eq!(store.load_all(), vec![first, second, third.clone()]);
        assert_eq!(store.get_recent(1), vec![third]);
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "[{\"File Name\": \"trunc").unwrap();
        let store = HistoryStore::new(path);

        assert!(store.load_all().is_empty());

        let rec = record("dog.png", Authenticity::Fake, "70.00%");
        store.append(&rec).unwrap();
        assert_eq!(store.load_all(), vec![rec]);
    }

    #[test]
    fn test_non_array_file_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"File Name": "x.png"}"#).unwrap();
        assert!(HistoryStore::new(path).load_all().is_empty());
    }

    #[test]
    fn test_legacy_entries_without_verdict() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[{"File Name": "old.png", "Date": "January 02, 2025 09:15 AM"}]"#,
        )
        .unwrap();
        let store = HistoryStore::new(path);

        let records = store.load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "old.png");
        assert_eq!(records[0].authenticity, None);
        assert_eq!(records[0].confidence, None);
    }

    #[test]
    fn test_unknown_entries_survive_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"[42, {"File Name": "a.png", "Date": "d"}]"#).unwrap();
        let store = HistoryStore::new(path.clone());

        let before = store.load_all();
        let rec = record("b.png", Authenticity::Real, "51.00%");
        store.append(&rec).unwrap();
        let after = store.load_all();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last(), Some(&rec));

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0], serde_json::json!(42));
    }

    #[test]
    fn test_load_all_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        store.append(&record("a.png", Authenticity::Real, "60.00%")).unwrap();

        assert_eq!(store.load_all(), store.load_all());
    }

    #[test]
    fn test_json_uses_display_column_names() {
        let json = serde_json::to_value(record("cat.jpg", Authenticity::Real, "85.81%")).unwrap();
        assert_eq!(json["File Name"], "cat.jpg");
        assert_eq!(json["Date"], "October 19, 2026 03:04 PM");
        assert_eq!(json["Authenticity"], "Real");
        assert_eq!(json["Confidence"], "85.81%");
    }

    #[test]
    fn test_timestamp_format_round_trips() {
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp_now(), TIMESTAMP_FORMAT).is_ok());
    }
}
