/*!
 * Reader/Writer Lock
 *
 * Many concurrent readers or a single writer, never both. Threads that
 * cannot enter are parked on one of two condition variables bound to the
 * internal state mutex:
 * - `readers_cv`: readers blocked by a writer
 * - `writers_cv`: writers blocked by readers or another writer
 *
 * # Handoff
 *
 * - Last reader out wakes exactly one queued writer.
 * - A releasing writer wakes one queued writer when no reader is queued,
 *   otherwise every queued reader.
 *
 * Notifications are always issued after the state mutex is released.
 */

use super::types::{FairnessPolicy, LockError, LockResult, LockStats};
use crate::core::sync::config::LockConfig;
use parking_lot::{Condvar, Mutex};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

#[derive(Debug, Default)]
struct State {
    readers: usize,
    writer: Option<ThreadId>,
    waiting_readers: usize,
    waiting_writers: usize,
}

impl State {
    #[inline]
    fn write_available(&self) -> bool {
        self.writer.is_none() && self.readers == 0
    }
}

/// Wake-up decided under the mutex, issued after it is released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Nobody,
    OneWriter,
    AllReaders,
}

/// Readers/writer lock with thread-identity writer tracking
///
/// # Examples
///
/// ```
/// use io_kernel::core::sync::ReaderWriterLock;
///
/// let lock = ReaderWriterLock::new();
/// {
///     let _a = lock.read();
///     let _b = lock.read();
///     assert_eq!(lock.reader_count(), 2);
/// }
/// let _w = lock.write();
/// assert!(lock.is_write_locked_by_current_thread());
/// ```
pub struct ReaderWriterLock {
    state: Mutex<State>,
    readers_cv: Condvar,
    writers_cv: Condvar,
    policy: FairnessPolicy,
}

impl ReaderWriterLock {
    /// Create an unlocked, reader-preferring lock
    pub fn new() -> Self {
        Self::with_config(LockConfig::default())
    }

    pub fn with_config(config: LockConfig) -> Self {
        Self {
            state: Mutex::new(State::default()),
            readers_cv: Condvar::new(),
            writers_cv: Condvar::new(),
            policy: config.policy,
        }
    }

    pub fn policy(&self) -> FairnessPolicy {
        self.policy
    }

    #[inline]
    fn read_blocked(&self, state: &State) -> bool {
        state.writer.is_some()
            || (self.policy == FairnessPolicy::WriterPreferring && state.waiting_writers > 0)
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    /// Block until no writer holds the lock, then join the readers
    pub fn lock_read(&self) {
        let mut state = self.state.lock();
        if state.writer == Some(thread::current().id()) {
            Self::misuse("lock_read called by the thread holding the write lock");
            return;
        }

        if self.read_blocked(&state) {
            trace!(waiting_writers = state.waiting_writers, "reader parked");
            state.waiting_readers += 1;
            while self.read_blocked(&state) {
                self.readers_cv.wait(&mut state);
            }
            state.waiting_readers -= 1;
        }
        state.readers += 1;
    }

    /// Join the readers only if that needs no waiting
    pub fn try_lock_read(&self) -> bool {
        let mut state = self.state.lock();
        if self.read_blocked(&state) {
            return false;
        }
        state.readers += 1;
        true
    }

    /// Like [`lock_read`](Self::lock_read) but gives up after `timeout`
    pub fn lock_read_timeout(&self, timeout: Duration) -> LockResult<()> {
        let start = Instant::now();
        let deadline = start + timeout;
        let mut state = self.state.lock();

        if self.read_blocked(&state) {
            state.waiting_readers += 1;
            while self.read_blocked(&state) {
                if self.readers_cv.wait_until(&mut state, deadline).timed_out()
                    && self.read_blocked(&state)
                {
                    state.waiting_readers -= 1;
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    debug!(elapsed_ms, "read lock timed out");
                    return Err(LockError::Timeout { elapsed_ms });
                }
            }
            state.waiting_readers -= 1;
        }
        state.readers += 1;
        Ok(())
    }

    /// Leave the readers; the last one out hands off to a writer
    pub fn unlock_read(&self) {
        let wake = {
            let mut state = self.state.lock();
            if state.readers == 0 {
                Self::misuse("unlock_read called with no active readers");
                return;
            }
            state.readers -= 1;
            if state.readers == 0 && state.waiting_writers > 0 {
                Wake::OneWriter
            } else {
                Wake::Nobody
            }
        };
        self.wake(wake);
    }

    // =========================================================================
    // WRITE SIDE
    // =========================================================================

    /// Block until there are no readers and no writer, then take ownership
    ///
    /// A thread that already owns the lock returns immediately (debug
    /// builds panic, since a single unlock will then release it).
    pub fn lock_write(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.writer == Some(me) {
            Self::misuse("lock_write called by the thread already holding the write lock");
            return;
        }

        if !state.write_available() {
            trace!(readers = state.readers, "writer parked");
            state.waiting_writers += 1;
            while !state.write_available() {
                self.writers_cv.wait(&mut state);
            }
            state.waiting_writers -= 1;
        }
        state.writer = Some(me);
    }

    /// Take ownership only if that needs no waiting
    ///
    /// Returns `false` if any thread, including the caller, holds the lock.
    pub fn try_lock_write(&self) -> bool {
        let mut state = self.state.lock();
        if !state.write_available() {
            return false;
        }
        state.writer = Some(thread::current().id());
        true
    }

    /// Like [`lock_write`](Self::lock_write) but gives up after `timeout`
    pub fn lock_write_timeout(&self, timeout: Duration) -> LockResult<()> {
        let me = thread::current().id();
        let start = Instant::now();
        let deadline = start + timeout;
        let mut state = self.state.lock();
        if state.writer == Some(me) {
            return Err(LockError::Reentrant);
        }

        if !state.write_available() {
            state.waiting_writers += 1;
            while !state.write_available() {
                if self.writers_cv.wait_until(&mut state, deadline).timed_out()
                    && !state.write_available()
                {
                    state.waiting_writers -= 1;
                    // We may have swallowed a handoff meant for a writer, and
                    // a writer-preferring lock may now have no queued writer.
                    let wake = self.after_writer_gave_up(&state);
                    drop(state);
                    self.wake(wake);
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    debug!(elapsed_ms, "write lock timed out");
                    return Err(LockError::Timeout { elapsed_ms });
                }
            }
            state.waiting_writers -= 1;
        }
        state.writer = Some(me);
        Ok(())
    }

    /// Release ownership and hand off to the next writer or to the readers
    pub fn unlock_write(&self) {
        let me = thread::current().id();
        let wake = {
            let mut state = self.state.lock();
            match state.writer {
                Some(owner) if owner == me => {}
                Some(_) => {
                    Self::misuse("unlock_write called by a thread that does not own the lock");
                    return;
                }
                None => {
                    Self::misuse("unlock_write called while not write-locked");
                    return;
                }
            }
            state.writer = None;
            self.after_write_release(&state)
        };
        self.wake(wake);
    }

    fn after_write_release(&self, state: &State) -> Wake {
        if self.policy == FairnessPolicy::WriterPreferring && state.waiting_writers > 0 {
            return Wake::OneWriter;
        }
        if state.waiting_readers == 0 {
            if state.waiting_writers > 0 {
                Wake::OneWriter
            } else {
                Wake::Nobody
            }
        } else {
            Wake::AllReaders
        }
    }

    fn after_writer_gave_up(&self, state: &State) -> Wake {
        if state.write_available() && state.waiting_writers > 0 {
            Wake::OneWriter
        } else if state.writer.is_none() && state.waiting_readers > 0 && !self.read_blocked(state)
        {
            Wake::AllReaders
        } else {
            Wake::Nobody
        }
    }

    #[inline]
    fn wake(&self, wake: Wake) {
        match wake {
            Wake::Nobody => {}
            Wake::OneWriter => {
                self.writers_cv.notify_one();
            }
            Wake::AllReaders => {
                let woken = self.readers_cv.notify_all();
                trace!(woken, "readers released");
            }
        }
    }

    #[cold]
    fn misuse(msg: &'static str) {
        if cfg!(debug_assertions) {
            panic!("{msg}");
        }
        error!(reason = msg, "reader/writer lock misuse ignored");
    }

    // =========================================================================
    // DIAGNOSTICS
    // =========================================================================

    pub fn reader_count(&self) -> usize {
        self.state.lock().readers
    }

    pub fn is_write_locked(&self) -> bool {
        self.state.lock().writer.is_some()
    }

    pub fn is_write_locked_by_current_thread(&self) -> bool {
        self.state.lock().writer == Some(thread::current().id())
    }

    /// Snapshot of counters; stale as soon as it returns
    pub fn stats(&self) -> LockStats {
        let state = self.state.lock();
        LockStats {
            readers: state.readers,
            write_locked: state.writer.is_some(),
            waiting_readers: state.waiting_readers,
            waiting_writers: state.waiting_writers,
            policy: self.policy,
        }
    }
}

impl Default for ReaderWriterLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReaderWriterLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("ReaderWriterLock")
            .field("readers", &stats.readers)
            .field("write_locked", &stats.write_locked)
            .field("waiting_readers", &stats.waiting_readers)
            .field("waiting_writers", &stats.waiting_writers)
            .field("policy", &stats.policy)
            .finish()
    }
}
