/*!
 * Synchronization Configuration
 *
 * Construction-time configuration for the reader/writer lock
 */

use super::rwlock::FairnessPolicy;

/// Reader/writer lock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockConfig {
    /// Handoff policy between queued readers and writers
    pub policy: FairnessPolicy,
}

impl LockConfig {
    /// Readers are never blocked by queued writers, only by an active one
    pub const fn reader_preferring() -> Self {
        Self {
            policy: FairnessPolicy::ReaderPreferring,
        }
    }

    /// Queued writers block new readers (no writer starvation)
    pub const fn writer_preferring() -> Self {
        Self {
            policy: FairnessPolicy::WriterPreferring,
        }
    }
}
