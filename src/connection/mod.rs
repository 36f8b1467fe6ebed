// src/connection/mod.rs

//! Manages the lifecycle of a single client connection: framing, session
//! state, and handing request lines to the dispatcher.

// Declare the private sub-modules of the `connection` module.
mod guard;
mod handler;
mod session;
mod transport;

// Publicly re-export the primary types from the sub-modules.
pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
pub use session::{CommandListMode, Session};
pub use transport::{Connection, LineConnection, MAX_LINE_LENGTH};
