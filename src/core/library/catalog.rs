// src/core/library/catalog.rs

use super::Track;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::info;

/// The synchronous query surface of the media catalog.
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Looks up a single track by its URI.
    fn get(&self, uri: &str) -> Option<Track>;
    /// Returns every known track, ordered by URI.
    fn tracks(&self) -> Vec<Track>;
}

/// Layout of a catalog index file: a list of `[[tracks]]` tables.
#[derive(Deserialize, Debug, Default)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

/// A catalog held entirely in memory, keyed by URI.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    tracks: BTreeMap<String, Track>,
}

impl MemoryCatalog {
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            tracks: tracks
                .into_iter()
                .map(|track| (track.uri.clone(), track))
                .collect(),
        }
    }

    /// Loads a catalog from a TOML index file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file at '{path}'"))?;
        let file: CatalogFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog TOML from '{path}'"))?;
        let catalog = Self::new(file.tracks);
        info!("Loaded {} tracks from catalog '{}'.", catalog.len(), path);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn get(&self, uri: &str) -> Option<Track> {
        self.tracks.get(uri).cloned()
    }

    fn tracks(&self) -> Vec<Track> {
        self.tracks.values().cloned().collect()
    }
}
