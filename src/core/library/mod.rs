// src/core/library/mod.rs

//! The media catalog and the play queue consulted by command handlers.
//!
//! Scanning music directories and extracting tags is done by an external
//! indexer; the server only reads the index it produced.

pub mod catalog;
pub mod playlist;

pub use catalog::{Catalog, MemoryCatalog};
pub use playlist::{Playlist, PlaylistEntry};

use serde::Deserialize;

/// A single track record as provided by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub track: Option<u32>,
    /// Duration in whole seconds.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Track {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Renders the track as `key: value` lines; absent tags are omitted.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("file: {}", self.uri)];
        let tags = [
            ("Title", self.title.as_deref()),
            ("Artist", self.artist.as_deref()),
            ("Album", self.album.as_deref()),
            ("Comment", self.comment.as_deref()),
            ("Genre", self.genre.as_deref()),
        ];
        for (key, value) in tags {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                lines.push(format!("{key}: {value}"));
            }
        }
        if let Some(year) = self.year {
            lines.push(format!("Date: {year}"));
        }
        if let Some(track) = self.track {
            lines.push(format!("Track: {track}"));
        }
        if let Some(duration) = self.duration {
            lines.push(format!("Time: {duration}"));
        }
        lines
    }
}
