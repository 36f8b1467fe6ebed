// src/core/handler/pipeline/success.rs

use super::{Next, Stage};
use crate::core::handler::CommandContext;
use crate::core::protocol::{OK, Response};

/// Terminates successful responses with `OK`, at most once.
pub struct SuccessSentinel;

impl Stage for SuccessSentinel {
    fn name(&self) -> &'static str {
        "success"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response {
        let mut response = next.run(ctx, line);
        if response.is_ok() && !response.ends_with_ack() {
            response.lines.push(OK.to_string());
        }
        response
    }
}
