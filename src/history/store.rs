//! File-backed calculation history.
//!
//! Each tool gets one JSON file, `<dir>/<key>-<version>.json`, holding a
//! list of entries newest first. Loading is best effort: a missing or
//! corrupt file gives an empty history.

use crate::config::Config;
use crate::error::{NetCalcError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One recorded calculation. `input` and `result` are opaque to the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub input: Value,
    pub result: Value,
}

impl HistoryEntry {
    /// Timestamp rendered in `tz`, or the raw number if out of range.
    pub fn local_time(&self, tz: chrono_tz::Tz) -> String {
        match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.timestamp) {
            Some(dt) => dt
                .with_timezone(&tz)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
            None => self.timestamp.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
    entries: Vec<HistoryEntry>,
    sequence: u64,
}

/// Keep only records that deserialize as [`HistoryEntry`].
fn valid_entries(records: Vec<Value>, source: &str) -> Vec<HistoryEntry> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<HistoryEntry>(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropping invalid history record from {source}: {e}");
                None
            }
        })
        .collect()
}

fn parse_records(json: &str) -> Result<Vec<Value>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        NetCalcError::History(format!("Error parsing history JSON at '{path}': {}", e.inner()))
    })
}

impl HistoryStore {
    /// Open the history for `key` using the directory, version and limit
    /// from `config`.
    pub fn open(config: &Config, key: &str) -> HistoryStore {
        let file = format!("{key}-{}.json", config.history_version);
        let path = config.history_dir.join(file);
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Reading history file: {}", path.display());
                match parse_records(&json) {
                    Ok(records) => valid_entries(records, &path.display().to_string()),
                    Err(e) => {
                        log::warn!("Ignoring history file {}: {e}", path.display());
                        Vec::new()
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("History file not found, starting empty: {}", path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("Cannot read history file {}: {e}", path.display());
                Vec::new()
            }
        };
        let mut store = HistoryStore {
            path,
            limit: config.history_limit,
            entries,
            sequence: 0,
        };
        store.entries.truncate(store.limit.max(1));
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn next_id(&mut self, timestamp: i64) -> String {
        loop {
            self.sequence += 1;
            let id = format!("{timestamp}-{}", self.sequence);
            if self.get_entry(&id).is_none() {
                return id;
            }
        }
    }

    /// Record a calculation at the front, dropping the oldest past the limit.
    pub fn add_entry(&mut self, input: Value, result: Value) -> &HistoryEntry {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let id = self.next_id(timestamp);
        self.entries.insert(
            0,
            HistoryEntry {
                id,
                timestamp,
                input,
                result,
            },
        );
        self.entries.truncate(self.limit.max(1));
        &self.entries[0]
    }

    /// Returns `true` if an entry was removed.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every entry and delete the file.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Removed history file: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Pretty JSON of all entries.
    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Replace the history with the valid entries of `json`.
    ///
    /// Entries are sorted newest first and cut to the limit. Returns the
    /// number kept.
    pub fn import(&mut self, json: &str) -> Result<usize> {
        let mut entries = valid_entries(parse_records(json)?, "import");
        if entries.is_empty() {
            return Err(NetCalcError::History(
                "No valid history entries to import".to_string(),
            ));
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(self.limit.max(1));
        self.entries = entries;
        Ok(self.entries.len())
    }

    /// Open the history for `key`, add one entry and save it.
    ///
    /// Failures are logged and reported as `false`; the history is a cache.
    pub fn record(config: &Config, key: &str, input: Value, result: Value) -> bool {
        let mut store = HistoryStore::open(config, key);
        store.add_entry(input, result);
        match store.save() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not save history: {e}");
                false
            }
        }
    }

    /// Write the history to its file, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&self.entries)?;
        log::info!("Writing history file: {}", self.path.display());
        std::fs::write(&self.path, json).map_err(|e| {
            NetCalcError::History(format!(
                "Error writing history file {}: {e}",
                self.path.display()
            ))
        })
    }
}
