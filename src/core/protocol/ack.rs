// src/core/protocol/ack.rs

//! The protocol error model: the only error type the request pipeline understands.

use thiserror::Error;

/// The numeric error classes of the protocol, rendered as the `<code>` part of
/// an `ACK [<code>@<index>]` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AckKind {
    NotList,
    Arg,
    Password,
    Permission,
    Unknown,
    NoExist,
    PlaylistMax,
    System,
    PlaylistLoad,
    UpdateAlready,
    PlayerSync,
    Exist,
}

impl AckKind {
    /// The wire code of this error class.
    pub fn code(self) -> u16 {
        match self {
            AckKind::NotList => 1,
            AckKind::Arg => 2,
            AckKind::Password => 3,
            AckKind::Permission => 4,
            AckKind::Unknown => 5,
            AckKind::NoExist => 50,
            AckKind::PlaylistMax => 51,
            AckKind::System => 52,
            AckKind::PlaylistLoad => 53,
            AckKind::UpdateAlready => 54,
            AckKind::PlayerSync => 55,
            AckKind::Exist => 56,
        }
    }
}

/// A structured protocol failure.
///
/// `list_index` is left unset by producers that do not know the command-list
/// position; the error boundary of the pipeline fills it in from the session.
/// An unset index renders as `0`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ACK [{}@{}] {{{}}} {}", .kind.code(), .list_index.unwrap_or(0), .command, .message)]
pub struct AckError {
    pub kind: AckKind,
    pub list_index: Option<usize>,
    pub command: String,
    pub message: String,
}

impl AckError {
    pub fn new(kind: AckKind, command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            list_index: None,
            command: command.into(),
            message: message.into(),
        }
    }

    /// Pins the command-list position this error is reported at.
    pub fn at(mut self, list_index: usize) -> Self {
        self.list_index = Some(list_index);
        self
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::new(AckKind::Unknown, name, format!("unknown command \"{name}\""))
    }

    pub fn incorrect_arguments(name: &str) -> Self {
        Self::new(AckKind::Arg, name, "incorrect arguments")
    }

    pub fn permission_denied(name: &str) -> Self {
        Self::new(
            AckKind::Permission,
            name,
            format!("you don't have permission for \"{name}\""),
        )
    }

    /// Renders the error as a single wire line (without the trailing newline).
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}
