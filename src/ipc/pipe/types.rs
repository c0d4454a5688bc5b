/*!
 * Pipe Types
 * Errors and statistics for FIFO byte pipes
 */

use crate::core::types::Size;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipe error types
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PipeError {
    #[error("Capacity exceeded: requested {requested}, available {available} of {limit} bytes")]
    #[diagnostic(
        code(pipe::capacity_exceeded),
        help("The consumer is not draining the pipe. Read or discard before writing more.")
    )]
    CapacityExceeded {
        requested: Size,
        available: Size,
        limit: Size,
    },
}

/// Pipe statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipeStats {
    pub buffered: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Size>,
    pub total_written: u64,
    pub total_consumed: u64,
}
