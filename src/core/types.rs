/*!
 * Core Types
 * Common types used across the kernel
 */

/// Size type for buffer operations
pub type Size = usize;

/// Port number for stream sockets
pub type Port = u16;
