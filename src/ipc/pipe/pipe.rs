/*!
 * Pipe Implementation
 * Append-at-tail, consume-at-head byte buffer backed by `BytesMut`
 */

use super::types::{PipeError, PipeStats};
use crate::core::limits::DEFAULT_PIPE_INITIAL_CAPACITY;
use crate::core::types::Size;
use bytes::{Buf, Bytes, BytesMut};

/// FIFO byte pipe
///
/// Writes are all-or-nothing; reads and discards take whatever is there.
/// Nothing blocks. The pipe is not internally synchronized: wrap it in a
/// mutex to share it between threads.
///
/// # Examples
///
/// ```
/// use io_kernel::ipc::Pipe;
///
/// let mut pipe = Pipe::new();
/// pipe.write(&[1, 2, 3, 4, 5]).unwrap();
/// pipe.discard(2);
///
/// let mut out = [0u8; 10];
/// let n = pipe.read(&mut out);
/// assert_eq!(&out[..n], &[3, 4, 5]);
/// assert_eq!(pipe.peek_size(), 0);
/// ```
#[derive(Clone, Default)]
pub struct Pipe {
    buffer: BytesMut,
    limit: Option<Size>,
    total_written: u64,
    total_consumed: u64,
}

impl std::fmt::Debug for Pipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe")
            .field("buffered_bytes", &self.buffer.len())
            .field("limit", &self.limit)
            .field("total_written", &self.total_written)
            .field("total_consumed", &self.total_consumed)
            .finish()
    }
}

impl Pipe {
    /// Unbounded pipe
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(DEFAULT_PIPE_INITIAL_CAPACITY),
            ..Default::default()
        }
    }

    /// Pipe that rejects writes which would buffer more than `limit` bytes
    pub fn with_limit(limit: Size) -> Self {
        Self {
            buffer: BytesMut::with_capacity(DEFAULT_PIPE_INITIAL_CAPACITY.min(limit)),
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn limit(&self) -> Option<Size> {
        self.limit
    }

    /// Append `data` to the tail
    ///
    /// Returns `data.len()`. With a limit set, a write that does not fit is
    /// rejected whole and nothing is appended.
    pub fn write(&mut self, data: &[u8]) -> Result<Size, PipeError> {
        if let Some(limit) = self.limit {
            let available = limit.saturating_sub(self.buffer.len());
            if data.len() > available {
                return Err(PipeError::CapacityExceeded {
                    requested: data.len(),
                    available,
                    limit,
                });
            }
        }

        self.buffer.extend_from_slice(data);
        self.total_written += data.len() as u64;
        Ok(data.len())
    }

    pub fn write_str(&mut self, text: &str) -> Result<Size, PipeError> {
        self.write(text.as_bytes())
    }

    /// Let `fill` write up to `max` bytes straight into the tail
    ///
    /// `max` is capped at the free space. Only the count `fill` reports is
    /// kept; on error nothing is appended.
    pub fn fill_with<E>(
        &mut self,
        max: Size,
        fill: impl FnOnce(&mut [u8]) -> Result<Size, E>,
    ) -> Result<Size, E> {
        let max = self.available_space().map_or(max, |space| space.min(max));
        let start = self.buffer.len();
        self.buffer.resize(start + max, 0);

        let result = fill(&mut self.buffer[start..]);
        let filled = match &result {
            Ok(n) => (*n).min(max),
            Err(_) => 0,
        };
        self.buffer.truncate(start + filled);
        self.total_written += filled as u64;
        result.map(|_| filled)
    }

    /// Move up to `buf.len()` bytes from the head into `buf`
    pub fn read(&mut self, buf: &mut [u8]) -> Size {
        let n = buf.len().min(self.buffer.len());
        buf[..n].copy_from_slice(&self.buffer[..n]);
        self.consume(n);
        n
    }

    /// Detach up to `max` bytes from the head without copying
    pub fn read_bytes(&mut self, max: Size) -> Bytes {
        let n = max.min(self.buffer.len());
        self.total_consumed += n as u64;
        self.buffer.split_to(n).freeze()
    }

    pub fn read_to_vec(&mut self, max: Size) -> Vec<u8> {
        self.read_bytes(max).to_vec()
    }

    /// Drop up to `n` bytes from the head, returning how many were dropped
    pub fn discard(&mut self, n: Size) -> Size {
        let n = n.min(self.buffer.len());
        self.consume(n);
        n
    }

    #[inline]
    fn consume(&mut self, n: Size) {
        self.buffer.advance(n);
        self.total_consumed += n as u64;
    }

    /// Buffered bytes, head first
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn peek_size(&self) -> Size {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Room left before the limit; `None` when unbounded
    pub fn available_space(&self) -> Option<Size> {
        self.limit
            .map(|limit| limit.saturating_sub(self.buffer.len()))
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn stats(&self) -> PipeStats {
        PipeStats {
            buffered: self.buffer.len(),
            limit: self.limit,
            total_written: self.total_written,
            total_consumed: self.total_consumed,
        }
    }
}
