// src/core/state.rs

//! Defines the central `ServerState` shared by every connection task.

use crate::config::Config;
use crate::core::events::{IdleBus, Subsystem};
use crate::core::library::{Catalog, MemoryCatalog, Playlist};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// State shared across all sessions. Session-specific state lives in
/// [`crate::connection::Session`] and is never stored here.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub catalog: Arc<dyn Catalog>,
    pub playlist: Mutex<Playlist>,
    pub idle_bus: IdleBus,
    pub started_at: Instant,
}

impl ServerState {
    pub fn new(config: Config, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            config,
            catalog,
            playlist: Mutex::new(Playlist::new()),
            idle_bus: IdleBus::new(),
            started_at: Instant::now(),
        }
    }

    /// Builds a state with an empty catalog. Used by tests and benchmarks.
    pub fn with_config(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryCatalog::default()))
    }

    /// The configured password, if authentication is enabled.
    pub fn password(&self) -> Option<&str> {
        self.config.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Runs `f` against the playlist and announces a `playlist` change if the
    /// queue version moved.
    pub fn mutate_playlist<R>(&self, f: impl FnOnce(&mut Playlist) -> R) -> R {
        let (result, changed) = {
            let mut playlist = self.playlist.lock();
            let before = playlist.version();
            let result = f(&mut playlist);
            (result, playlist.version() != before)
        };
        if changed {
            self.idle_bus.publish(Subsystem::Playlist);
        }
        result
    }
}
