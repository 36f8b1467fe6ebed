// src/core/handler/pipeline/mod.rs

//! Contains the individual steps of the request processing pipeline and the
//! driver that chains them.
//!
//! Each stage receives the request line and a [`Next`] handle for the rest of
//! the chain. A stage may call the remainder, short-circuit with its own
//! response, or post-process what the remainder returned.

mod authenticate;
mod command_list;
mod error_boundary;
mod idle_gate;
mod invoke;
mod success;

pub use authenticate::Authenticate;
pub use command_list::CommandListBatch;
pub use error_boundary::ErrorBoundary;
pub use idle_gate::IdleGate;
pub use invoke::Invoke;
pub use success::SuccessSentinel;

use super::dispatcher::CommandContext;
use crate::core::protocol::Response;

/// One step of the request pipeline.
pub trait Stage: Sync {
    /// A short name used in traces.
    fn name(&self) -> &'static str;

    /// Handles `line`, delegating to the rest of the chain through `next` as needed.
    fn invoke(&self, ctx: &mut CommandContext<'_>, line: &str, next: Next<'_>) -> Response;
}

/// The fixed, ordered stage chain every request passes through.
pub static PIPELINE: &[&dyn Stage] = &[
    &ErrorBoundary,
    &Authenticate,
    &CommandListBatch,
    &IdleGate,
    &SuccessSentinel,
    &Invoke,
];

/// The remainder of the chain after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    remaining: &'a [&'a dyn Stage],
}

impl<'a> Next<'a> {
    pub fn new(stages: &'a [&'a dyn Stage]) -> Self {
        Self { remaining: stages }
    }

    /// Runs the next stage. An exhausted chain yields an empty response.
    pub fn run(self, ctx: &mut CommandContext<'_>, line: &str) -> Response {
        match self.remaining.split_first() {
            Some((stage, rest)) => {
                tracing::trace!(stage = stage.name(), "entering pipeline stage");
                stage.invoke(ctx, line, Next { remaining: rest })
            }
            None => Response::empty(),
        }
    }
}
