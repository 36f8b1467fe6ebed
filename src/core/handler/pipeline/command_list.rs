// src/core/handler/pipeline/command_list.rs

//! Pipeline step for `command_list_begin` ... `command_list_end` batching.
//!
//! While a batch is being received, every line other than `command_list_end`
//! is buffered without further processing. While a batch executes, each
//! buffered command runs through the whole pipeline again; this stage then
//! strips the individual `OK` so that only the batch as a whole is
//! terminated by one.

use super::{Next, Stage};
use crate::core::commands::CommandId;
use crate::core::handler::CommandContext;
use crate::core::protocol::{self, LIST_OK, Response};

pub struct CommandListBatch;

impl Stage for CommandListBatch {
    fn name(&self) -> &'static str {
        "command_list"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response {
        let is_end = protocol::command_name(line) == CommandId::CommandListEnd.name();

        if ctx.session.is_receiving_command_list() && !is_end {
            ctx.session.buffer_command(line);
            return Response::empty();
        }

        let mut response = next.run(ctx, line);
        if !response.is_ok() || is_end {
            return response;
        }

        if ctx.session.is_receiving_command_list() {
            // The `command_list_begin` that opened the batch stays silent.
            response.strip_ok();
        } else if ctx.session.is_executing_command_list() {
            response.strip_ok();
            if ctx.session.is_list_ok_mode() {
                response.lines.push(LIST_OK.to_string());
            }
        }
        response
    }
}
