// src/core/library/playlist.rs

use super::Track;

/// Upper bound on the number of queued entries.
pub const MAX_PLAYLIST_LENGTH: usize = 16384;

/// A queued track together with its stable queue id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: u32,
    pub track: Track,
}

/// The play queue. Every mutation bumps `version`, which clients observe via `status`.
#[derive(Debug, Clone)]
pub struct Playlist {
    version: u32,
    next_id: u32,
    entries: Vec<PlaylistEntry>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            version: 1,
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&PlaylistEntry> {
        self.entries.get(position)
    }

    /// Appends a track and returns its queue id, or `None` if the queue is full.
    pub fn add(&mut self, track: Track) -> Option<u32> {
        if self.entries.len() >= MAX_PLAYLIST_LENGTH {
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(PlaylistEntry { id, track });
        self.increase_version();
        Some(id)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.increase_version();
    }

    fn increase_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

