/*!
 * Socket Traits
 *
 * The seam between the buffering layer and a raw stream socket. Implemented
 * for [`TcpSocket`](super::TcpSocket); anything byte-stream shaped (a Unix
 * stream, an in-memory script in tests) can implement it too.
 */

use std::io;
use std::net::{Shutdown, SocketAddr};

/// Single-shot, best-effort stream socket operations
///
/// Implementations must be:
/// - **Single-shot**: one OS call per method, no internal retry loops
/// - **Non-blocking on `peek`**: report `WouldBlock` when nothing is pending
///
/// `send` and `recv` may block if the underlying socket is in blocking
/// mode; readiness-driven callers should configure it non-blocking.
pub trait SocketIo: Send {
    /// Hand bytes to the OS, returning how many it accepted
    fn send(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Take bytes from the OS
    ///
    /// `Ok(0)` with a non-empty `buf` means the peer closed its write side.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Copy pending bytes without consuming them
    ///
    /// `Ok(0)` means end of stream, `WouldBlock` means nothing pending.
    fn peek(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Shut down one or both directions
    fn shutdown(&mut self, how: Shutdown) -> io::Result<()>;

    /// Remote address, if known
    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }
}
