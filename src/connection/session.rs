// src/connection/session.rs

//! Defines the state associated with a single client session.

use super::transport::Connection;
use crate::core::SpinelTuneError;
use crate::core::events::Subsystem;
use crate::core::metrics;
use crate::core::protocol::OK;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// The command-list batching state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandListMode {
    /// No batch is being collected or executed.
    #[default]
    Inactive,
    /// Lines are being buffered until `command_list_end`.
    Receiving { list_ok: bool },
    /// The buffered lines are being run one by one.
    Executing { list_ok: bool },
}

/// Holds the protocol state of a single client session together with the
/// connection it was accepted on.
pub struct Session {
    id: u64,
    peer: String,
    connection: Option<Box<dyn Connection>>,
    /// True if the client has successfully authenticated.
    pub is_authenticated: bool,
    command_list: CommandListMode,
    command_list_buffer: Vec<String>,
    command_list_index: usize,
    subscriptions: BTreeSet<Subsystem>,
    pending_events: BTreeSet<Subsystem>,
    prevent_timeout: bool,
    is_closed: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("peer", &self.peer)
            .field("is_authenticated", &self.is_authenticated)
            .field("command_list", &self.command_list)
            .field("command_list_index", &self.command_list_index)
            .field("subscriptions", &self.subscriptions)
            .field("pending_events", &self.pending_events)
            .field("is_closed", &self.is_closed)
            .finish()
    }
}

impl Session {
    /// Creates a new `Session` that owns `connection`.
    pub fn new(id: u64, connection: Box<dyn Connection>, is_auth_required: bool) -> Self {
        let peer = connection.peer().to_string();
        debug!("New session {} for {}", id, peer);
        Self {
            id,
            peer,
            connection: Some(connection),
            is_authenticated: !is_auth_required,
            command_list: CommandListMode::Inactive,
            command_list_buffer: Vec::new(),
            command_list_index: 0,
            subscriptions: BTreeSet::new(),
            pending_events: BTreeSet::new(),
            prevent_timeout: false,
            is_closed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// The underlying connection, unless the session was already released.
    pub fn connection_mut(&mut self) -> Result<&mut (dyn Connection + 'static), SpinelTuneError> {
        self.connection
            .as_deref_mut()
            .ok_or(SpinelTuneError::ConnectionReleased)
    }

    // --- Lifecycle ---

    /// Marks the session closed. The connection loop stops reading and
    /// releases the stream; nothing further is written to the client.
    pub fn close(&mut self) {
        if !self.is_closed {
            info!("Close session {} ({})", self.id, self.peer);
            self.is_closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// Closes the underlying stream. Only the first call reaches the stream.
    pub async fn release(&mut self) -> Result<(), SpinelTuneError> {
        self.is_closed = true;
        if self.is_idle() {
            metrics::IDLE_CLIENTS.dec();
            self.subscriptions.clear();
        }
        match self.connection.take() {
            Some(mut connection) => connection.close().await,
            None => Ok(()),
        }
    }

    // --- Command lists ---

    pub fn command_list_mode(&self) -> CommandListMode {
        self.command_list
    }

    pub fn is_receiving_command_list(&self) -> bool {
        matches!(self.command_list, CommandListMode::Receiving { .. })
    }

    pub fn is_executing_command_list(&self) -> bool {
        matches!(self.command_list, CommandListMode::Executing { .. })
    }

    /// True if the running batch was opened with `command_list_ok_begin`.
    pub fn is_list_ok_mode(&self) -> bool {
        matches!(
            self.command_list,
            CommandListMode::Receiving { list_ok: true } | CommandListMode::Executing { list_ok: true }
        )
    }

    pub fn command_list_index(&self) -> usize {
        self.command_list_index
    }

    pub fn set_command_list_index(&mut self, index: usize) {
        self.command_list_index = index;
    }

    /// Starts collecting a batch. Returns false if a batch is already active.
    pub fn begin_command_list(&mut self, list_ok: bool) -> bool {
        if self.command_list != CommandListMode::Inactive {
            return false;
        }
        self.command_list = CommandListMode::Receiving { list_ok };
        self.command_list_buffer.clear();
        true
    }

    pub fn buffer_command(&mut self, line: &str) {
        self.command_list_buffer.push(line.to_string());
    }

    pub fn buffered_commands(&self) -> &[String] {
        &self.command_list_buffer
    }

    /// Switches a receiving batch to execution and hands out its lines.
    /// Returns `None` if no batch was being received.
    pub fn start_command_list_execution(&mut self) -> Option<Vec<String>> {
        let CommandListMode::Receiving { list_ok } = self.command_list else {
            return None;
        };
        self.command_list = CommandListMode::Executing { list_ok };
        Some(std::mem::take(&mut self.command_list_buffer))
    }

    /// Clears all batching state once a batch completed or aborted.
    pub fn finish_command_list(&mut self) {
        self.command_list = CommandListMode::Inactive;
        self.command_list_buffer.clear();
    }

    // --- Idle mode ---

    /// A session is idle while it holds subscriptions.
    pub fn is_idle(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn prevent_timeout(&self) -> bool {
        self.prevent_timeout
    }

    pub fn subscriptions(&self) -> &BTreeSet<Subsystem> {
        &self.subscriptions
    }

    pub fn pending_events(&self) -> &BTreeSet<Subsystem> {
        &self.pending_events
    }

    /// Subscribes to `subsystems`. If matching events are already pending,
    /// returns their `changed:` lines and stays out of idle mode; otherwise
    /// enters idle mode and returns nothing.
    pub fn enter_idle(&mut self, subsystems: BTreeSet<Subsystem>) -> Vec<String> {
        self.subscriptions = subsystems;
        let changed = self.take_changed();
        if !changed.is_empty() {
            self.subscriptions.clear();
            return changed;
        }
        if !self.subscriptions.is_empty() {
            self.prevent_timeout = true;
            metrics::IDLE_CLIENTS.inc();
            debug!("Session {} is now idle on {:?}", self.id, self.subscriptions);
        }
        Vec::new()
    }

    /// Leaves idle mode, dropping subscriptions and pending events.
    pub fn leave_idle(&mut self) {
        if self.is_idle() {
            metrics::IDLE_CLIENTS.dec();
        }
        self.subscriptions.clear();
        self.pending_events.clear();
        self.prevent_timeout = false;
    }

    /// Records a subsystem change. If it completes a pending `idle`, returns
    /// the deferred response (`changed:` lines followed by `OK`) and leaves
    /// idle mode.
    pub fn record_event(&mut self, subsystem: Subsystem) -> Option<Vec<String>> {
        self.pending_events.insert(subsystem);
        self.flush_idle()
    }

    /// Treats every subsystem as changed. Used when events may have been missed.
    pub fn mark_all_pending(&mut self) -> Option<Vec<String>> {
        self.pending_events.extend(Subsystem::iter());
        self.flush_idle()
    }

    fn flush_idle(&mut self) -> Option<Vec<String>> {
        if !self.is_idle() {
            return None;
        }
        let mut lines = self.take_changed();
        if lines.is_empty() {
            return None;
        }
        metrics::IDLE_CLIENTS.dec();
        self.subscriptions.clear();
        self.prevent_timeout = false;
        lines.push(OK.to_string());
        Some(lines)
    }

    /// Removes pending events matching the subscriptions and renders them.
    fn take_changed(&mut self) -> Vec<String> {
        let changed: Vec<Subsystem> = self
            .pending_events
            .intersection(&self.subscriptions)
            .copied()
            .collect();
        changed
            .into_iter()
            .map(|subsystem| {
                self.pending_events.remove(&subsystem);
                format!("changed: {subsystem}")
            })
            .collect()
    }
}
