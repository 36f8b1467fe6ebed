// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use super::session::Session;
use super::transport::Connection;
use crate::core::SpinelTuneError;
use crate::core::events::Subsystem;
use crate::core::handler::Dispatcher;
use crate::core::protocol;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection: greeting, request
/// dispatch, deferred `idle` responses and teardown.
pub struct ConnectionHandler {
    session: Session,
    dispatcher: Dispatcher,
    events: broadcast::Receiver<Subsystem>,
    shutdown_rx: broadcast::Receiver<()>,
    timeout: Option<Duration>,
    permit: Option<OwnedSemaphorePermit>,
}

impl ConnectionHandler {
    /// Creates a new `ConnectionHandler` around an accepted connection.
    pub fn new(
        connection: Box<dyn Connection>,
        session_id: u64,
        dispatcher: Dispatcher,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let state = dispatcher.state();
        let is_auth_required = state.password().is_some();
        let events = state.idle_bus.subscribe();
        let timeout = state.config.connection_timeout();
        Self {
            session: Session::new(session_id, connection, is_auth_required),
            dispatcher,
            events,
            shutdown_rx,
            timeout,
            permit: None,
        }
    }

    /// Attaches the client slot this connection occupies; it is returned when the handler finishes.
    pub fn with_permit(mut self, permit: OwnedSemaphorePermit) -> Self {
        self.permit = Some(permit);
        self
    }

    /// Runs the connection until the peer disconnects, the session is closed
    /// or the server shuts down. The stream is always released afterwards.
    pub async fn run(&mut self) -> Result<(), SpinelTuneError> {
        let _guard = ConnectionGuard::new(
            self.session.id(),
            self.session.peer().to_string(),
            self.permit.take(),
        );
        let result = self.serve().await;
        if let Err(e) = self.session.release().await {
            debug!("Error while releasing session {}: {}", self.session.id(), e);
        }
        match result {
            Err(e) if e.is_normal_disconnect() => {
                debug!("Connection from {} closed by peer: {}", self.session.peer(), e);
                Ok(())
            }
            other => other,
        }
    }

    /// The main event loop: reads requests and delivers subsystem events.
    async fn serve(&mut self) -> Result<(), SpinelTuneError> {
        self.write(&[protocol::greeting()]).await?;
        let mut deadline = self.next_deadline();

        loop {
            if self.session.is_closed() {
                break;
            }
            let expiry = if self.session.prevent_timeout() {
                None
            } else {
                deadline
            };

            let action = tokio::select! {
                // Prioritize shutdown signals over other events.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.session.peer());
                    NextAction::ExitLoop
                }
                _ = sleep_until(expiry.unwrap_or_else(Instant::now)), if expiry.is_some() => {
                    info!(
                        "Closing connection from {} after {}s of inactivity.",
                        self.session.peer(),
                        self.timeout.map_or(0, |t| t.as_secs())
                    );
                    NextAction::ExitLoop
                }
                event = self.events.recv() => match self.handle_event(event).await? {
                    // A delivered idle response counts as activity.
                    (action, true) => {
                        deadline = self.next_deadline();
                        action
                    }
                    (action, false) => action,
                },
                request = read_request(&mut self.session) => match request? {
                    Some(line) => {
                        deadline = self.next_deadline();
                        self.handle_line(&line).await?
                    }
                    None => {
                        debug!("Connection from {} closed by peer.", self.session.peer());
                        NextAction::ExitLoop
                    }
                },
            };

            if let NextAction::ExitLoop = action {
                break;
            }
        }
        Ok(())
    }

    /// The instant after which a silent client is disconnected, if a timeout is configured.
    fn next_deadline(&self) -> Option<Instant> {
        self.timeout.map(|limit| Instant::now() + limit)
    }

    /// Dispatches one request line and writes its response.
    async fn handle_line(&mut self, line: &str) -> Result<NextAction, SpinelTuneError> {
        debug!("Session {}: --> {}", self.session.id(), line);
        let response = self.dispatcher.handle_request(&mut self.session, line, 0);
        if let Some(e) = &response.error {
            warn!("Session {}: command failed: {}", self.session.id(), e);
        }

        // A closed session gets no further output.
        if self.session.is_closed() {
            return Ok(NextAction::ExitLoop);
        }

        for out in &response.lines {
            debug!("Session {}: <-- {}", self.session.id(), out);
        }
        self.write(&response.lines).await?;
        Ok(NextAction::Continue)
    }

    /// Records a subsystem event and, if it completes an `idle`, writes the
    /// deferred response. The flag reports whether anything was written.
    async fn handle_event(
        &mut self,
        event: Result<Subsystem, RecvError>,
    ) -> Result<(NextAction, bool), SpinelTuneError> {
        let deferred = match event {
            Ok(subsystem) => self.session.record_event(subsystem),
            Err(RecvError::Lagged(missed)) => {
                warn!(
                    "Session {}: idle receiver lagged, missed {} events. Treating all subsystems as changed.",
                    self.session.id(),
                    missed
                );
                self.session.mark_all_pending()
            }
            Err(RecvError::Closed) => {
                warn!("The idle event bus was closed. Closing connection.");
                return Ok((NextAction::ExitLoop, false));
            }
        };

        let Some(lines) = deferred else {
            return Ok((NextAction::Continue, false));
        };
        for out in &lines {
            debug!("Session {}: <-- {}", self.session.id(), out);
        }
        self.write(&lines).await?;
        Ok((NextAction::Continue, true))
    }

    async fn write(&mut self, lines: &[String]) -> Result<(), SpinelTuneError> {
        if lines.is_empty() {
            return Ok(());
        }
        self.session.connection_mut()?.write_lines(lines).await
    }
}

/// Reads the next request line. `Ok(None)` means the peer closed the stream.
async fn read_request(session: &mut Session) -> Result<Option<String>, SpinelTuneError> {
    session.connection_mut()?.read_line().await
}
