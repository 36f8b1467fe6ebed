// src/core/handler/mod.rs

//! The request dispatch pipeline: the `Dispatcher` entry point and the
//! ordered stages every request line passes through.

pub mod dispatcher;
pub mod pipeline;

pub use dispatcher::{CommandContext, Dispatcher};
pub use pipeline::{Next, PIPELINE, Stage};
