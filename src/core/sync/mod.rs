/*!
 * Synchronization Primitives
 *
 * Blocking primitives for protecting resources shared between OS threads.
 *
 * # Architecture
 *
 * - `ReaderWriterLock`: many readers or one writer, parked on condvars
 *   bound to a single internal `parking_lot::Mutex`
 * - `LockConfig`: construction-time fairness policy
 *
 * Bounded waits are available through the `*_timeout` variants; there is
 * no cancellation.
 */

mod config;
pub mod rwlock;

pub use config::LockConfig;
pub use rwlock::{
    FairnessPolicy, LockError, LockResult, LockStats, ReadGuard, ReaderWriterLock, WriteGuard,
};
