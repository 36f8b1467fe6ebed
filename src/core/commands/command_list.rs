// src/core/commands/command_list.rs

//! `command_list_begin`, `command_list_ok_begin` and `command_list_end`.

use super::{CommandId, Params};
use crate::core::handler::CommandContext;
use crate::core::protocol::{AckError, AckKind};
use tracing::{debug, warn};

pub fn begin(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    open(ctx, CommandId::CommandListBegin, false)
}

pub fn ok_begin(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    open(ctx, CommandId::CommandListOkBegin, true)
}

fn open(
    ctx: &mut CommandContext<'_>,
    id: CommandId,
    list_ok: bool,
) -> Result<Vec<String>, AckError> {
    if !ctx.session.begin_command_list(list_ok) {
        return Err(AckError::new(
            AckKind::Arg,
            id.name(),
            "command lists cannot be nested",
        ));
    }
    Ok(Vec::new())
}

/// Runs every buffered command through the full pipeline, in order, stopping
/// at the first failure. The output of the commands that ran is returned; a
/// failure leaves its `ACK` line last.
pub fn end(ctx: &mut CommandContext<'_>, _params: &Params) -> Result<Vec<String>, AckError> {
    let Some(commands) = ctx.session.start_command_list_execution() else {
        return Err(AckError::new(
            AckKind::NotList,
            CommandId::CommandListEnd.name(),
            "not in command list",
        ));
    };
    debug!(
        "Session {} executing command list of {} commands.",
        ctx.session.id(),
        commands.len()
    );

    let outer_index = ctx.session.command_list_index();
    let mut lines = Vec::new();
    for (index, line) in commands.iter().enumerate() {
        let response = ctx.dispatcher.handle_request(ctx.session, line, index);
        lines.extend(response.lines);
        if let Some(e) = response.error {
            warn!(
                "Session {}: command list aborted at position {}: {}",
                ctx.session.id(),
                index,
                e
            );
            break;
        }
        if ctx.session.is_closed() {
            break;
        }
    }

    ctx.session.finish_command_list();
    ctx.session.set_command_list_index(outer_index);
    Ok(lines)
}
