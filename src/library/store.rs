use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::JukeboxError;

/// One persisted library record, keyed externally by an opaque track key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub artist: String,
    /// 1..=5 when rated, absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub play_count: u32,
    pub file_path: String,
}

/// Flat JSON store mapping track keys to entries.
///
/// Single-process, single-writer: every mutation rewrites the whole file.
/// A missing file on open is treated as an empty library so a fresh setup
/// works without manual steps.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    entries: BTreeMap<String, LibraryEntry>,
}

impl MetadataStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JukeboxError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| JukeboxError::Store(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(JukeboxError::Store(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&LibraryEntry> {
        self.entries.get(key)
    }

    /// Set a track's rating. Values outside 1..=5 are rejected and the store
    /// stays untouched.
    pub fn update_rating(&mut self, key: &str, rating: u8) -> Result<(), JukeboxError> {
        if !(1..=5).contains(&rating) {
            return Err(JukeboxError::RatingValidation);
        }
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| JukeboxError::MetadataNotFound(key.to_string()))?;
        entry.rating = Some(rating);
        self.save()?;
        debug!(key, rating, "rating updated");
        Ok(())
    }

    /// Bump a track's play count by one and return the new value.
    pub fn increment_play_count(&mut self, key: &str) -> Result<u32, JukeboxError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| JukeboxError::MetadataNotFound(key.to_string()))?;
        entry.play_count += 1;
        let count = entry.play_count;
        self.save()?;
        Ok(count)
    }

    /// Insert or replace an entry under `key`.
    pub fn insert(&mut self, key: &str, entry: LibraryEntry) -> Result<(), JukeboxError> {
        self.entries.insert(key.to_string(), entry);
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in key order, for the library pane.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LibraryEntry)> {
        self.entries.iter()
    }

    fn save(&self) -> Result<(), JukeboxError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| JukeboxError::Store(e.to_string()))?;
        fs::write(&self.path, text)
            .map_err(|e| JukeboxError::Store(format!("{}: {e}", self.path.display())))
    }
}

/// Parse the rating dialog's text input. Non-numeric input and anything
/// outside 1..=5 fail validation before reaching the store.
pub fn parse_rating(input: &str) -> Result<u8, JukeboxError> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or(JukeboxError::RatingValidation)
}
