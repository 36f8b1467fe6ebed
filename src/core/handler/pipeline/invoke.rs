// src/core/handler/pipeline/invoke.rs

//! The terminal pipeline step: resolves the command and runs its handler.

use super::{Next, Stage};
use crate::core::handler::CommandContext;
use crate::core::metrics;
use crate::core::protocol::Response;

pub struct Invoke;

impl Stage for Invoke {
    fn name(&self) -> &'static str {
        "invoke"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, _next: Next<'_>) -> Response {
        let (handler, params) = match ctx.registry().lookup(line) {
            Ok((descriptor, params)) => (descriptor.handler, params),
            Err(e) => return Response::failed(e),
        };
        metrics::COMMANDS_PROCESSED_TOTAL.inc();
        handler(ctx, &params).into()
    }
}
