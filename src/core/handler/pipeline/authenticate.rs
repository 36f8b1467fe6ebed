// src/core/handler/pipeline/authenticate.rs

//! Pipeline step for gating commands behind the configured password.

use super::{Next, Stage};
use crate::core::handler::CommandContext;
use crate::core::protocol::{self, AckError, Response};

pub struct Authenticate;

impl Stage for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response {
        if ctx.session.is_authenticated {
            return next.run(ctx, line);
        }
        if ctx.state().password().is_none() {
            ctx.session.is_authenticated = true;
            return next.run(ctx, line);
        }

        let name = protocol::command_name(line);
        // Unregistered commands are refused as well; they never reach the registry.
        let permitted = ctx
            .registry()
            .get(name)
            .is_some_and(|descriptor| !descriptor.auth_required);
        if permitted {
            next.run(ctx, line)
        } else {
            Response::failed(AckError::permission_denied(name))
        }
    }
}
