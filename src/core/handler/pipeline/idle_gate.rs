// src/core/handler/pipeline/idle_gate.rs

//! Pipeline step enforcing idle mode.
//!
//! An idle client may only send `noidle`; anything else is a protocol
//! violation and the session is closed without a response.

use super::{Next, Stage};
use crate::core::commands::CommandId;
use crate::core::handler::CommandContext;
use crate::core::protocol::{self, Response};
use tracing::warn;

pub struct IdleGate;

impl Stage for IdleGate {
    fn name(&self) -> &'static str {
        "idle_gate"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response {
        let is_noidle = protocol::command_name(line) == CommandId::NoIdle.name();

        if ctx.session.is_idle() {
            if is_noidle {
                ctx.session.leave_idle();
            } else {
                warn!(
                    "Session {} sent '{}' while idle. Closing connection.",
                    ctx.session.id(),
                    line
                );
                ctx.session.close();
            }
            return Response::empty();
        }

        if is_noidle {
            return Response::empty();
        }

        let response = next.run(ctx, line);
        if response.is_ok() && ctx.session.is_idle() {
            // The response is deferred until a subscribed subsystem changes.
            return Response::empty();
        }
        response
    }
}
