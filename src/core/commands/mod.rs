// src/core/commands/mod.rs

//! This module defines every supported command and the registry that maps a
//! request line to its handler.
//!
//! Commands form the closed enumeration [`CommandId`]. Each identifier carries
//! its argument pattern, whether it requires authentication, and its handler.
//! [`CommandRegistry`] compiles the patterns once at startup.

use crate::core::handler::CommandContext;
use crate::core::protocol::AckError;
use std::collections::HashMap;
use strum_macros::{Display, EnumIter, IntoStaticStr};

mod command_list;
mod connection;
mod idle;
mod playlist;
mod reflection;
mod registry;
mod status;

pub use registry::{CommandDescriptor, CommandRegistry};

/// Named captures of a matched request line, keyed by group name.
pub type Params = HashMap<String, String>;

/// The signature every command handler implements. Handlers return their
/// payload lines without the trailing `OK`; the pipeline appends it.
pub type Handler = fn(&mut CommandContext<'_>, &Params) -> Result<Vec<String>, AckError>;

/// Every command the server understands. The serialized name is the command
/// keyword on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CommandId {
    // --- Connection ---
    Close,
    Ping,
    Password,

    // --- Status ---
    Status,
    Stats,

    // --- Idle ---
    Idle,
    #[strum(serialize = "noidle")]
    NoIdle,

    // --- Command lists ---
    CommandListBegin,
    CommandListOkBegin,
    CommandListEnd,

    // --- Queue ---
    #[strum(serialize = "playlistinfo")]
    PlaylistInfo,
    Add,
    Clear,

    // --- Reflection ---
    Commands,
    #[strum(serialize = "notcommands")]
    NotCommands,
}

impl CommandId {
    /// The command keyword, used as the registry key.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether the command is refused until the client has authenticated.
    pub fn auth_required(self) -> bool {
        !matches!(
            self,
            CommandId::Close
                | CommandId::Ping
                | CommandId::Password
                | CommandId::CommandListBegin
                | CommandId::CommandListOkBegin
                | CommandId::CommandListEnd
                | CommandId::Commands
                | CommandId::NotCommands
        )
    }

    /// The pattern a full request line must match. Anchoring is added by the registry.
    pub fn pattern(self) -> &'static str {
        match self {
            CommandId::Close => "close",
            CommandId::Ping => "ping",
            CommandId::Password => r#"password "(?P<password>[^"]+)""#,
            CommandId::Status => "status",
            CommandId::Stats => "stats",
            CommandId::Idle => r#"idle(?: (?P<subsystems>[^"]+))?"#,
            CommandId::NoIdle => "noidle",
            CommandId::CommandListBegin => "command_list_begin",
            CommandId::CommandListOkBegin => "command_list_ok_begin",
            CommandId::CommandListEnd => "command_list_end",
            CommandId::PlaylistInfo => r#"playlistinfo(?: "?(?P<pos>\d+)"?)?"#,
            CommandId::Add => r#"add "(?P<uri>[^"]+)""#,
            CommandId::Clear => "clear",
            CommandId::Commands => "commands",
            CommandId::NotCommands => "notcommands",
        }
    }

    pub fn handler(self) -> Handler {
        match self {
            CommandId::Close => connection::close,
            CommandId::Ping => connection::ping,
            CommandId::Password => connection::password,
            CommandId::Status => status::status,
            CommandId::Stats => status::stats,
            CommandId::Idle => idle::idle,
            CommandId::NoIdle => idle::noidle,
            CommandId::CommandListBegin => command_list::begin,
            CommandId::CommandListOkBegin => command_list::ok_begin,
            CommandId::CommandListEnd => command_list::end,
            CommandId::PlaylistInfo => playlist::playlistinfo,
            CommandId::Add => playlist::add,
            CommandId::Clear => playlist::clear,
            CommandId::Commands => reflection::commands,
            CommandId::NotCommands => reflection::notcommands,
        }
    }
}
