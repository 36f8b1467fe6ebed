// src/core/protocol/mod.rs

//! Wire-level vocabulary of the line protocol: sentinels, the greeting, the
//! `ACK` error model and the response type threaded through the pipeline.

pub mod ack;
pub mod response;

pub use ack::{AckError, AckKind};
pub use response::Response;

/// The protocol version announced in the greeting line.
pub const PROTOCOL_VERSION: &str = "0.17.0";

/// The success sentinel terminating every successful response.
pub const OK: &str = "OK";

/// Emitted after each command of a `command_list_ok_begin` batch.
pub const LIST_OK: &str = "list_OK";

/// Prefix of the error sentinel line.
pub const ACK_PREFIX: &str = "ACK";

/// Builds the greeting sent once when a client connects.
pub fn greeting() -> String {
    format!("OK MPD {PROTOCOL_VERSION}")
}

/// Extracts the command name: everything before the first space, or the whole line.
pub fn command_name(line: &str) -> &str {
    line.split_once(' ').map_or(line, |(name, _)| name)
}
