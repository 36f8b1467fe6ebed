// src/core/handler/dispatcher.rs

//! The entry point of the request pipeline.
//!
//! The `Dispatcher` receives one raw request line from the `ConnectionHandler`
//! (or from a running command list) and threads it through the fixed stage
//! chain in [`PIPELINE`]. Stages and handlers work against a [`CommandContext`]
//! which bundles the session with the shared dispatcher.

use super::pipeline::{Next, PIPELINE};
use crate::connection::Session;
use crate::core::SpinelTuneError;
use crate::core::commands::CommandRegistry;
use crate::core::metrics;
use crate::core::protocol::{self, Response};
use crate::core::state::ServerState;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug_span;

/// Everything a stage or a command handler may touch while handling one request.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub dispatcher: &'a Dispatcher,
}

impl<'a> CommandContext<'a> {
    /// Shared server state: config, catalog, playlist and the idle bus.
    pub fn state(&self) -> &'a ServerState {
        &self.dispatcher.state
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        &self.dispatcher.registry
    }
}

/// Routes request lines through the stage chain. Cheap to clone; every
/// connection task holds its own handle.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    state: Arc<ServerState>,
}

impl Dispatcher {
    pub fn new(state: Arc<ServerState>, registry: Arc<CommandRegistry>) -> Self {
        Self { registry, state }
    }

    /// Builds a dispatcher with a freshly compiled command registry.
    pub fn with_state(state: Arc<ServerState>) -> Result<Self, SpinelTuneError> {
        Ok(Self::new(state, Arc::new(CommandRegistry::new()?)))
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handles one request line. `list_index` is the line's position inside a
    /// running command list, or 0 for a top-level request.
    ///
    /// The returned response is always well formed: a failure shows up as a
    /// single `ACK` line with the error kept alongside for logging.
    pub fn handle_request(&self, session: &mut Session, line: &str, list_index: usize) -> Response {
        session.set_command_list_index(list_index);

        let span = debug_span!(
            "request",
            session.id = session.id(),
            command = protocol::command_name(line),
            list.index = list_index,
        );
        let _entered = span.enter();

        let start_time = Instant::now();
        let mut ctx = CommandContext {
            session,
            dispatcher: self,
        };
        let response = Next::new(PIPELINE).run(&mut ctx, line);
        metrics::COMMAND_LATENCY_SECONDS.observe(start_time.elapsed().as_secs_f64());
        response
    }
}
