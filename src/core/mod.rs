// src/core/mod.rs

//! The central module containing the core logic and data structures of SpinelTune.

pub mod commands;
pub mod errors;
pub mod events;
pub mod handler;
pub mod library;
pub mod metrics;
pub mod protocol;
pub mod state;

pub use errors::SpinelTuneError;
pub use protocol::{AckError, AckKind, Response};
