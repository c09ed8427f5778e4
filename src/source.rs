//! Track sources and the hand-off store between the generation flow and the player.
//!
//! The generation flow records the newest track in a [`TrackStore`]; the
//! player reads it back and receives the source as an explicit argument.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Reference to a playable audio resource (a generated WAV file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    path: PathBuf,
}

impl TrackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Application-level store holding the most recently generated track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStore {
    current: Option<TrackSource>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored track (a new generation supersedes the old one)
    pub fn set(&mut self, source: TrackSource) {
        debug!("Track store: {}", source.path().display());
        self.current = Some(source);
    }

    pub fn current(&self) -> Option<&TrackSource> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Load a store from disk; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Track store {} not found, starting empty", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist the store so the track survives a restart
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_previous_track() {
        let mut store = TrackStore::new();
        store.set(TrackSource::new("first.wav"));
        store.set(TrackSource::new("second.wav"));
        assert_eq!(store.current(), Some(&TrackSource::new("second.wav")));

        store.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = TrackStore::new();
        store.set(TrackSource::new("/tmp/track.wav"));
        store.save(&path).unwrap();

        let loaded = TrackStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TrackStore::load(&dir.path().join("absent.json")).unwrap();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        assert!(TrackStore::load(&path).is_err());
    }
}
