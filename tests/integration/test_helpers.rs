// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

// Not every test crate that includes this file uses every helper.
#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use spineltune::config::Config;
use spineltune::connection::{ConnectionHandler, LineConnection, Session};
use spineltune::core::handler::Dispatcher;
use spineltune::core::library::{MemoryCatalog, Track};
use spineltune::core::protocol::Response;
use spineltune::core::state::ServerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::DuplexStream;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::codec::{Framed, LinesCodec};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// How long a test waits for a line before deciding none is coming.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Sets up minimal tracing for tests (ignores the error if already initialized).
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// A small catalog shared by the tests.
pub fn sample_tracks() -> Vec<Track> {
    vec![
        Track {
            uri: "albums/blue/01-intro.ogg".to_string(),
            title: Some("Intro".to_string()),
            artist: Some("The Examples".to_string()),
            album: Some("Blue".to_string()),
            genre: Some("Jazz".to_string()),
            year: Some(1999),
            track: Some(1),
            duration: Some(95),
            ..Default::default()
        },
        Track {
            uri: "albums/blue/02-outro.ogg".to_string(),
            title: Some("Outro".to_string()),
            artist: Some("The Examples".to_string()),
            album: Some("Blue".to_string()),
            track: Some(2),
            duration: Some(180),
            ..Default::default()
        },
        Track {
            uri: "singles/untagged.mp3".to_string(),
            ..Default::default()
        },
    ]
}

/// Builds shared server state backed by the sample catalog.
pub fn test_state(config: Config) -> Arc<ServerState> {
    Arc::new(ServerState::new(
        config,
        Arc::new(MemoryCatalog::new(sample_tracks())),
    ))
}

/// A config that requires `password` before protected commands run.
pub fn config_with_password(password: &str) -> Config {
    Config {
        password: Some(password.to_string()),
        ..Config::default()
    }
}

/// TestContext drives the request pipeline directly for a single session,
/// without a connection loop in front of it.
pub struct TestContext {
    pub state: Arc<ServerState>,
    pub dispatcher: Dispatcher,
    pub session: Session,
    // Keeps the client half of the in-memory transport open.
    _client: DuplexStream,
}

impl TestContext {
    /// Creates a new test context with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new test context with custom configuration
    pub fn with_config(config: Config) -> Self {
        Self::with_state(test_state(config))
    }

    pub fn with_state(state: Arc<ServerState>) -> Self {
        init_tracing();
        let dispatcher =
            Dispatcher::with_state(state.clone()).expect("Failed to build the command registry");
        let (client, server) = tokio::io::duplex(64 * 1024);
        let is_auth_required = state.password().is_some();
        let session = Session::new(
            1,
            Box::new(LineConnection::new(server, "test-client")),
            is_auth_required,
        );
        Self {
            state,
            dispatcher,
            session,
            _client: client,
        }
    }

    /// Runs one request line through the pipeline.
    pub fn send(&mut self, line: &str) -> Response {
        self.dispatcher.handle_request(&mut self.session, line, 0)
    }

    /// Runs one request line and returns only the wire lines.
    pub fn lines(&mut self, line: &str) -> Vec<String> {
        self.send(line).lines
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A client talking to a real `ConnectionHandler` over an in-memory stream.
pub struct TestClient {
    framed: Framed<DuplexStream, LinesCodec>,
    pub task: JoinHandle<()>,
}

impl TestClient {
    /// Spawns a connection handler for a new session and returns the client end.
    pub fn connect(
        dispatcher: &Dispatcher,
        session_id: u64,
        shutdown_tx: &broadcast::Sender<()>,
    ) -> Self {
        init_tracing();
        let (client, server) = tokio::io::duplex(64 * 1024);
        let mut handler = ConnectionHandler::new(
            Box::new(LineConnection::new(server, format!("test-client-{session_id}"))),
            session_id,
            dispatcher.clone(),
            shutdown_tx.subscribe(),
        );
        let task = tokio::spawn(async move {
            let _ = handler.run().await;
        });
        Self {
            framed: Framed::new(client, LinesCodec::new()),
            task,
        }
    }

    pub async fn send(&mut self, line: &str) {
        self.framed
            .send(line)
            .await
            .expect("Failed to write to the test connection");
    }

    /// Writes a line, tolerating a server that already hung up.
    pub async fn try_send(&mut self, line: &str) -> bool {
        self.framed.send(line).await.is_ok()
    }

    /// Reads the next line. `None` means the server closed the stream.
    pub async fn read_line(&mut self) -> Option<String> {
        tokio::time::timeout(READ_TIMEOUT, self.framed.next())
            .await
            .expect("Timed out waiting for a line from the server")
            .map(|line| line.expect("Failed to decode a line from the server"))
    }

    /// Reads lines up to and including the terminating `OK` or `ACK` line.
    pub async fn read_response(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line().await {
            let done = line == "OK" || line.starts_with("ACK");
            lines.push(line);
            if done {
                break;
            }
        }
        lines
    }

    /// Asserts that nothing arrives within the read timeout.
    pub async fn expect_silence(&mut self) {
        let next = tokio::time::timeout(READ_TIMEOUT, self.framed.next()).await;
        assert!(next.is_err(), "expected no output, got {next:?}");
    }
}
