// src/core/commands/registry.rs

use super::{CommandId, Handler, Params};
use crate::core::SpinelTuneError;
use crate::core::protocol::{self, AckError};
use regex::Regex;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::debug;

/// A registered command: its identity, auth requirement, compiled pattern and handler.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub auth_required: bool,
    pub pattern: Regex,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("auth_required", &self.auth_required)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The immutable command table, built once before any connection is accepted
/// and shared read-only by every session.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDescriptor>,
}

impl CommandRegistry {
    /// Compiles the pattern of every `CommandId`. Each pattern is anchored so
    /// that it must match the whole request line.
    pub fn new() -> Result<Self, SpinelTuneError> {
        let mut commands = HashMap::new();
        for id in CommandId::iter() {
            let pattern = Regex::new(&format!("^(?:{})$", id.pattern())).map_err(|source| {
                SpinelTuneError::InvalidPattern {
                    command: id.name(),
                    source,
                }
            })?;
            commands.insert(
                id.name(),
                CommandDescriptor {
                    id,
                    auth_required: id.auth_required(),
                    pattern,
                    handler: id.handler(),
                },
            );
        }
        debug!("Command registry initialized with {} commands.", commands.len());
        Ok(Self { commands })
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All registered command names in lexical order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolves a request line to its descriptor and the named captures of the match.
    pub fn lookup(&self, line: &str) -> Result<(&CommandDescriptor, Params), AckError> {
        let name = protocol::command_name(line);
        let descriptor = self
            .get(name)
            .ok_or_else(|| AckError::unknown_command(name))?;
        let captures = descriptor
            .pattern
            .captures(line)
            .ok_or_else(|| AckError::incorrect_arguments(name))?;

        let params = descriptor
            .pattern
            .capture_names()
            .flatten()
            .filter_map(|group| {
                captures
                    .name(group)
                    .map(|m| (group.to_string(), m.as_str().to_string()))
            })
            .collect();
        Ok((descriptor, params))
    }
}
