// src/core/handler/pipeline/error_boundary.rs

//! Pipeline step that turns any failure into a well-formed `ACK` line.

use super::{Next, Stage};
use crate::core::handler::CommandContext;
use crate::core::metrics;
use crate::core::protocol::Response;

/// The outermost stage. The only place where an `AckError` is rendered.
pub struct ErrorBoundary;

impl Stage for ErrorBoundary {
    fn name(&self) -> &'static str {
        "error_boundary"
    }

    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response {
        let mut response = next.run(ctx, line);
        if let Some(error) = response.error.take() {
            let error = match error.list_index {
                Some(_) => error,
                None => error.at(ctx.session.command_list_index()),
            };
            let kind: &'static str = error.kind.into();
            metrics::ACK_ERRORS_TOTAL.with_label_values(&[kind]).inc();
            response.lines = vec![error.to_line()];
            response.error = Some(error);
        }
        response
    }
}
