/*!
 * Pipe Module
 * In-memory FIFO byte pipes
 */

pub mod pipe;
pub mod types;

// Re-export public API
pub use pipe::Pipe;
pub use types::{PipeError, PipeStats};
