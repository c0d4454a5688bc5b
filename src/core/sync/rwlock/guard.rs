/*!
 * Scoped Lock Guards
 *
 * RAII wrappers over the raw lock/unlock pairs. A write guard is tied to
 * the thread that acquired it, so it is neither `Send` nor `Sync`.
 */

use super::lock::ReaderWriterLock;
use super::types::LockResult;
use std::marker::PhantomData;
use std::time::Duration;

/// Shared access, released on drop
#[must_use = "the read lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ReadGuard<'a> {
    lock: &'a ReaderWriterLock,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock_read();
    }
}

/// Exclusive access, released on drop
#[must_use = "the write lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct WriteGuard<'a> {
    lock: &'a ReaderWriterLock,
    // Ownership is recorded by thread id; the guard must drop on that thread
    _not_send: PhantomData<*const ()>,
}

impl<'a> WriteGuard<'a> {
    /// Release the write lock and take a read lock in its place
    ///
    /// Not atomic: another writer may slip in between.
    pub fn downgrade(self) -> ReadGuard<'a> {
        let lock = self.lock;
        drop(self);
        lock.read()
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock_write();
    }
}

impl ReaderWriterLock {
    pub fn read(&self) -> ReadGuard<'_> {
        self.lock_read();
        ReadGuard { lock: self }
    }

    pub fn try_read(&self) -> Option<ReadGuard<'_>> {
        self.try_lock_read().then(|| ReadGuard { lock: self })
    }

    pub fn read_timeout(&self, timeout: Duration) -> LockResult<ReadGuard<'_>> {
        self.lock_read_timeout(timeout)?;
        Ok(ReadGuard { lock: self })
    }

    /// Exclusive access
    ///
    /// Calling this while the current thread already holds a write guard is
    /// misuse, as with [`lock_write`](Self::lock_write): debug builds panic.
    /// Release builds log an error and return a second guard over the same
    /// ownership, so whichever guard drops first releases the lock. Use
    /// [`write_timeout`](Self::write_timeout) to get `LockError::Reentrant`
    /// instead.
    pub fn write(&self) -> WriteGuard<'_> {
        self.lock_write();
        WriteGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    pub fn try_write(&self) -> Option<WriteGuard<'_>> {
        self.try_lock_write().then(|| WriteGuard {
            lock: self,
            _not_send: PhantomData,
        })
    }

    pub fn write_timeout(&self, timeout: Duration) -> LockResult<WriteGuard<'_>> {
        self.lock_write_timeout(timeout)?;
        Ok(WriteGuard {
            lock: self,
            _not_send: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards_release_on_drop() {
        let lock = ReaderWriterLock::new();
        {
            let _r1 = lock.read();
            let _r2 = lock.try_read().unwrap();
            assert!(lock.try_write().is_none());
        }
        assert_eq!(lock.reader_count(), 0);

        {
            let _w = lock.write();
            assert!(lock.try_read().is_none());
        }
        assert!(!lock.is_write_locked());
    }

    #[test]
    fn test_downgrade() {
        let lock = ReaderWriterLock::new();
        let w = lock.write();
        let r = w.downgrade();
        assert!(!lock.is_write_locked());
        assert_eq!(lock.reader_count(), 1);
        drop(r);
        assert!(lock.stats().is_idle());
    }

    #[test]
    fn test_write_timeout_refuses_reentry() {
        let lock = ReaderWriterLock::new();
        let _w = lock.write();
        assert!(matches!(
            lock.write_timeout(Duration::from_millis(5)),
            Err(crate::core::sync::LockError::Reentrant)
        ));
        assert!(lock.is_write_locked_by_current_thread());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "already holding the write lock")]
    fn test_nested_write_guard_asserts() {
        let lock = ReaderWriterLock::new();
        let _outer = lock.write();
        let _inner = lock.write();
    }
}
