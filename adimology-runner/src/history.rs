//! Calculation history: a capped list of committed calculations persisted
//! as a single JSON file.
//!
//! Entries are immutable snapshots. Committing reads the whole file, appends,
//! evicts the oldest entries beyond capacity and writes the whole file back.
//! Single user, single process: no locking.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use adimology_core::{CalculationInput, CalculationResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One committed calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input: CalculationInput,
    pub result: CalculationResult,
}

impl HistoryEntry {
    pub fn new(
        input: CalculationInput,
        result: CalculationResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: entry_id(&input, timestamp),
            timestamp,
            input,
            result,
        }
    }
}

/// Content-derived entry id: the first 16 hex chars of a blake3 hash over
/// the input fields and the timestamp.
pub fn entry_id(input: &CalculationInput, timestamp: DateTime<Utc>) -> String {
    let mut hasher = blake3::Hasher::new();
    for value in input.as_array() {
        hasher.update(&value.to_le_bytes());
    }
    hasher.update(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    hasher.finalize().to_hex().as_str()[..16].to_string()
}

/// In-memory history, oldest first, never longer than `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl CalculationHistory {
    /// Empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// History seeded with `entries` (oldest first), keeping only the newest
    /// `capacity` of them.
    pub fn with_entries(capacity: usize, entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new(capacity);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    /// Append an entry, returning whatever was evicted to make room.
    pub fn push(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        self.entries.push_back(entry);
        let overflow = self.entries.len().saturating_sub(self.capacity);
        self.entries.drain(..overflow).collect()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.entries.remove(index)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("history file {path} is corrupt: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no history entry with id {0}")]
    NotFound(String),
}

/// JSON file backing a [`CalculationHistory`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    /// Load the history. A missing file is an empty history.
    pub fn load(&self) -> Result<CalculationHistory, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(CalculationHistory::new(self.capacity));
            }
            Err(source) => return Err(self.io_error(source)),
        };
        if content.trim().is_empty() {
            return Ok(CalculationHistory::new(self.capacity));
        }

        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&content).map_err(|source| HistoryError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(CalculationHistory::with_entries(self.capacity, entries))
    }

    /// Write the whole history, creating parent directories if needed.
    pub fn save(&self, history: &CalculationHistory) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
        }
        let entries: Vec<&HistoryEntry> = history.iter().collect();
        let json = serde_json::to_string_pretty(&entries).map_err(|source| HistoryError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    /// Snapshot a calculation and append it.
    pub fn commit(
        &self,
        input: CalculationInput,
        result: CalculationResult,
    ) -> Result<HistoryEntry, HistoryError> {
        self.commit_at(input, result, Utc::now())
    }

    pub fn commit_at(
        &self,
        input: CalculationInput,
        result: CalculationResult,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoryEntry, HistoryError> {
        let mut history = self.load()?;
        let entry = HistoryEntry::new(input, result, timestamp);
        let evicted = history.push(entry.clone());
        if !evicted.is_empty() {
            tracing::info!(
                evicted = evicted.len(),
                capacity = history.capacity(),
                "history full, dropped oldest entries"
            );
        }
        self.save(&history)?;
        tracing::debug!(id = %entry.id, path = %self.path.display(), "history entry committed");
        Ok(entry)
    }

    pub fn delete(&self, id: &str) -> Result<HistoryEntry, HistoryError> {
        let mut history = self.load()?;
        let removed = history
            .remove(id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        self.save(&history)?;
        Ok(removed)
    }

    /// Remove every entry, returning how many were removed.
    pub fn clear(&self) -> Result<usize, HistoryError> {
        let mut history = self.load()?;
        let removed = history.clear();
        self.save(&history)?;
        Ok(removed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn io_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
