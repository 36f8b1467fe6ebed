// src/core/protocol/response.rs

use super::{ACK_PREFIX, AckError, OK};

/// The lines produced for one request, plus the protocol error (if any) that
/// produced them.
///
/// After the error boundary has run, a failed response holds exactly one
/// rendered `ACK` line and keeps the error for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub lines: Vec<String>,
    pub error: Option<AckError>,
}

impl Response {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines, error: None }
    }

    pub fn failed(error: AckError) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True if the last line is an `ACK` line.
    pub fn ends_with_ack(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| line.starts_with(ACK_PREFIX))
    }

    /// True if the last line is exactly the `OK` sentinel.
    pub fn ends_with_ok(&self) -> bool {
        self.lines.last().is_some_and(|line| line == OK)
    }

    /// Removes a trailing `OK` sentinel, if present.
    pub fn strip_ok(&mut self) {
        if self.ends_with_ok() {
            self.lines.pop();
        }
    }
}

impl From<Result<Vec<String>, AckError>> for Response {
    fn from(result: Result<Vec<String>, AckError>) -> Self {
        match result {
            Ok(lines) => Response::from_lines(lines),
            Err(e) => Response::failed(e),
        }
    }
}
