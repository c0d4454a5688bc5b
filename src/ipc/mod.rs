/*!
 * IPC Module
 * In-process byte transport between producers and consumers
 */

pub mod pipe;

// Re-export for convenience
pub use pipe::{Pipe, PipeError, PipeStats};
