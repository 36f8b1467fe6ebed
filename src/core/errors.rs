// src/core/errors.rs

//! Defines the primary error type for everything outside the request pipeline.
//!
//! Protocol-level failures that are reported to clients live in
//! [`crate::core::protocol::AckError`]; this type covers transport, codec,
//! configuration and startup failures which terminate a connection or the
//! server instead of producing an `ACK` line.

use std::sync::Arc;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// The main error enum for transport and server-level failures.
#[derive(Error, Debug)]
pub enum SpinelTuneError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Request line exceeds the maximum length")]
    LineTooLong,

    #[error("Connection already released")]
    ConnectionReleased,

    #[error("Invalid command pattern for '{command}': {source}")]
    InvalidPattern {
        command: &'static str,
        #[source]
        source: regex::Error,
    },
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for SpinelTuneError {
    fn clone(&self) -> Self {
        match self {
            SpinelTuneError::Io(e) => SpinelTuneError::Io(Arc::clone(e)),
            SpinelTuneError::LineTooLong => SpinelTuneError::LineTooLong,
            SpinelTuneError::ConnectionReleased => SpinelTuneError::ConnectionReleased,
            SpinelTuneError::InvalidPattern { command, source } => {
                SpinelTuneError::InvalidPattern {
                    command: *command,
                    source: source.clone(),
                }
            }
        }
    }
}

impl SpinelTuneError {
    /// Returns true for errors caused by the peer going away rather than by a fault.
    pub fn is_normal_disconnect(&self) -> bool {
        matches!(self, SpinelTuneError::Io(e) if matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ))
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for SpinelTuneError {
    fn from(e: std::io::Error) -> Self {
        SpinelTuneError::Io(Arc::new(e))
    }
}

impl From<LinesCodecError> for SpinelTuneError {
    fn from(e: LinesCodecError) -> Self {
        match e {
            LinesCodecError::MaxLineLengthExceeded => SpinelTuneError::LineTooLong,
            LinesCodecError::Io(io) => SpinelTuneError::Io(Arc::new(io)),
        }
    }
}
