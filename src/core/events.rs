// src/core/events.rs

//! Defines the subsystem event bus used to wake sessions waiting in `idle` mode.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::debug;

/// The capacity of the broadcast channel for subsystem events.
/// A receiver that falls further behind is told it lagged and treats every
/// subsystem as changed.
const IDLE_BUS_CAPACITY: usize = 1024;

/// A named area of server state a client can wait on with `idle`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Subsystem {
    Database,
    Update,
    StoredPlaylist,
    Playlist,
    Player,
    Mixer,
    Output,
    Options,
}

/// The distribution hub for subsystem change notifications (one-to-many).
#[derive(Debug)]
pub struct IdleBus {
    sender: Sender<Subsystem>,
}

impl Default for IdleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(IDLE_BUS_CAPACITY);
        Self { sender }
    }

    /// Announces that `subsystem` changed. Returns the number of sessions notified.
    pub fn publish(&self, subsystem: Subsystem) -> usize {
        match self.sender.send(subsystem) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Published a '{}' event with no connected sessions.", subsystem);
                0
            }
        }
    }

    /// Provides a new receiver for a connection handler.
    pub fn subscribe(&self) -> Receiver<Subsystem> {
        self.sender.subscribe()
    }
}
