// src/core/commands/idle.rs

//! The `idle` and `noidle` commands.
//!
//! Entering idle mode and leaving it again is enforced by the idle gate of the
//! pipeline; the handlers here only parse subscriptions and report pending
//! changes.

use super::{CommandId, Params};
use crate::core::events::Subsystem;
use crate::core::handler::CommandContext;
use crate::core::protocol::{AckError, AckKind};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum::IntoEnumIterator;

pub fn idle(ctx: &mut CommandContext<'_>, params: &Params) -> Result<Vec<String>, AckError> {
    if ctx.session.is_executing_command_list() {
        return Err(AckError::new(
            AckKind::Arg,
            CommandId::Idle.name(),
            "idle is not allowed in a command list",
        ));
    }

    let subsystems = match params.get("subsystems") {
        Some(list) => parse_subsystems(list)?,
        None => BTreeSet::new(),
    };
    let subsystems = if subsystems.is_empty() {
        Subsystem::iter().collect()
    } else {
        subsystems
    };

    Ok(ctx.session.enter_idle(subsystems))
}

/// Only reached outside idle mode, where it has nothing to cancel.
pub fn noidle(_ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    Ok(Vec::new())
}

fn parse_subsystems(list: &str) -> Result<BTreeSet<Subsystem>, AckError> {
    list.split_whitespace()
        .map(|name| {
            Subsystem::from_str(name).map_err(|_| {
                AckError::new(
                    AckKind::Arg,
                    CommandId::Idle.name(),
                    format!("Unrecognized idle event: {name}"),
                )
            })
        })
        .collect()
}
