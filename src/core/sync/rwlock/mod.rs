/*!
 * Reader/Writer Lock
 * Shared/exclusive locking with condvar-based parking
 */

mod guard;
mod lock;
mod types;

// Re-export public API
pub use guard::{ReadGuard, WriteGuard};
pub use lock::ReaderWriterLock;
pub use types::{FairnessPolicy, LockError, LockResult, LockStats};
