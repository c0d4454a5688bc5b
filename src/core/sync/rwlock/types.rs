/*!
 * Reader/Writer Lock Types
 * Errors and diagnostic snapshots
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for bounded lock acquisition
pub type LockResult<T> = Result<T, LockError>;

/// Lock acquisition errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum LockError {
    #[error("Lock acquisition timed out after {elapsed_ms}ms")]
    #[diagnostic(
        code(rwlock::timeout),
        help("The lock is held or contended. Retry, or use the blocking variant.")
    )]
    Timeout { elapsed_ms: u64 },

    #[error("Write lock already held by the calling thread")]
    #[diagnostic(
        code(rwlock::reentrant),
        help("Release the write lock before acquiring it again from the same thread.")
    )]
    Reentrant,
}

/// Which side of the lock is favored when both are queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessPolicy {
    /// Readers only wait for an active writer. Releasing the last reader
    /// hands off to one writer; releasing a writer wakes every queued
    /// reader if there are any, otherwise one writer.
    #[default]
    ReaderPreferring,
    /// New readers also wait while a writer is queued, and releasing a
    /// writer hands off to the next queued writer first.
    WriterPreferring,
}

/// Point-in-time view of the lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LockStats {
    pub readers: usize,
    pub write_locked: bool,
    pub waiting_readers: usize,
    pub waiting_writers: usize,
    pub policy: FairnessPolicy,
}

impl LockStats {
    /// True if nobody holds or waits on the lock
    pub fn is_idle(&self) -> bool {
        self.readers == 0
            && !self.write_locked
            && self.waiting_readers == 0
            && self.waiting_writers == 0
    }
}
