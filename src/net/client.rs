/*!
 * TCP Client
 *
 * Owns one connected stream socket and tracks per-direction liveness.
 *
 * # Liveness
 *
 * The read and write flags start set and are only ever cleared:
 * - read: by a 0-byte receive (peer close), a receive error, or `close`
 * - write: by a send error or `close`
 *
 * The flags are authoritative. [`TcpClient::probe_read_side`] asks the OS
 * directly but never touches them.
 */

use super::config::ChannelConfig;
use super::host::NetworkHost;
use super::socket::TcpSocket;
use super::traits::SocketIo;
use super::types::{NetError, NetResult, ReadProbe};
use crate::core::types::{Port, Size};
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr};
use tracing::{debug, trace, warn};

pub struct TcpClient<S: SocketIo = TcpSocket> {
    socket: Option<S>,
    read_connected: bool,
    write_connected: bool,
    peek_window: Size,
}

impl<S: SocketIo> std::fmt::Debug for TcpClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpClient")
            .field("peer", &self.peer_addr())
            .field("open", &self.socket.is_some())
            .field("read_connected", &self.read_connected)
            .field("write_connected", &self.write_connected)
            .finish()
    }
}

impl TcpClient<TcpSocket> {
    pub fn connect(host: &NetworkHost, config: &ChannelConfig) -> NetResult<Self> {
        let socket = TcpSocket::connect(host, config)?;
        Ok(Self::from_socket(socket, config))
    }

    pub fn connect_addr(host: &str, port: Port, config: &ChannelConfig) -> NetResult<Self> {
        Self::connect(&NetworkHost::new(host, port), config)
    }

    /// Connect to a host-order IPv4 address
    pub fn connect_ipv4(address: u32, port: Port, config: &ChannelConfig) -> NetResult<Self> {
        Self::connect(&NetworkHost::from_ipv4(address, port), config)
    }
}

impl<S: SocketIo> TcpClient<S> {
    /// Adopt a connected socket; both directions start live
    pub fn from_socket(socket: S, config: &ChannelConfig) -> Self {
        Self {
            socket: Some(socket),
            read_connected: true,
            write_connected: true,
            peek_window: config.max_read_chunk.max(1),
        }
    }

    /// Single-shot send
    ///
    /// Returns how many bytes the OS accepted; `Ok(0)` if it would block.
    /// Any other failure clears the write side.
    pub fn send(&mut self, data: &[u8]) -> NetResult<Size> {
        if !self.write_connected {
            return Err(NetError::NotConnected);
        }
        let Some(socket) = self.socket.as_mut() else {
            return Err(NetError::NotConnected);
        };

        match socket.send(data) {
            Ok(sent) => {
                trace!(sent, requested = data.len(), "send");
                Ok(sent)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                warn!(error = %e, peer = ?socket.peer_addr(), "send failed, write side closed");
                self.write_connected = false;
                Err(NetError::Send(e))
            }
        }
    }

    /// Single-shot receive
    ///
    /// `Ok(0)` means the peer closed its side; the read flag is cleared.
    pub fn receive(&mut self, buf: &mut [u8]) -> NetResult<Size> {
        if !self.read_connected {
            return Err(NetError::NotConnected);
        }
        let Some(socket) = self.socket.as_mut() else {
            return Err(NetError::NotConnected);
        };
        if buf.is_empty() {
            return Ok(0);
        }

        match socket.recv(buf) {
            Ok(0) => {
                debug!(peer = ?socket.peer_addr(), "peer closed read side");
                self.read_connected = false;
                Ok(0)
            }
            Ok(received) => {
                trace!(received, "receive");
                Ok(received)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Err(NetError::WouldBlock)
            }
            Err(e) => {
                warn!(error = %e, peer = ?socket.peer_addr(), "receive failed, read side closed");
                self.read_connected = false;
                Err(NetError::Receive(e))
            }
        }
    }

    /// Receive whatever the OS reports as pending
    ///
    /// Empty when nothing is pending. Unlike [`receive`](Self::receive) this
    /// cannot observe a peer close, since a closed socket reports nothing
    /// pending.
    pub fn receive_available(&mut self) -> NetResult<Vec<u8>> {
        let pending = self.available();
        if pending == 0 {
            return Ok(Vec::new());
        }

        let mut data = vec![0u8; pending];
        match self.receive(&mut data) {
            Ok(received) => {
                data.truncate(received);
                Ok(data)
            }
            Err(NetError::WouldBlock) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Bytes pending in the OS receive queue, capped at the peek window
    ///
    /// 0 when nothing is pending, at end of stream, or on error.
    pub fn available(&self) -> Size {
        let Some(socket) = self.socket.as_ref() else {
            return 0;
        };

        let mut window = vec![0u8; self.peek_window];
        socket.peek(&mut window).unwrap_or(0)
    }

    /// Ask the OS about the read side without consuming or updating flags
    pub fn probe_read_side(&self) -> ReadProbe {
        let Some(socket) = self.socket.as_ref() else {
            return ReadProbe::Closed;
        };

        let mut byte = [0u8; 1];
        match socket.peek(&mut byte) {
            Ok(0) => ReadProbe::PeerClosed,
            Ok(_) => ReadProbe::Pending(self.available()),
            Err(e) if e.kind() == ErrorKind::WouldBlock => ReadProbe::Idle,
            Err(e) => ReadProbe::Error(e.kind()),
        }
    }

    /// Clear the read flag; true if this call closed it
    pub fn mark_read_closed(&mut self) -> bool {
        std::mem::replace(&mut self.read_connected, false)
    }

    /// Clear the write flag; true if this call closed it
    pub fn mark_write_closed(&mut self) -> bool {
        std::mem::replace(&mut self.write_connected, false)
    }

    /// Shut down and release the socket
    ///
    /// Idempotent: returns true only for the call that released it.
    pub fn close(&mut self) -> bool {
        self.read_connected = false;
        self.write_connected = false;

        let Some(mut socket) = self.socket.take() else {
            return false;
        };
        if let Err(e) = socket.shutdown(Shutdown::Both) {
            // Already reset by the peer, most likely
            debug!(error = %e, "shutdown on close failed");
        }
        debug!(peer = ?socket.peer_addr(), "socket closed");
        true
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    pub fn is_read_connected(&self) -> bool {
        self.read_connected
    }

    pub fn is_write_connected(&self) -> bool {
        self.write_connected
    }

    /// Either direction still live
    pub fn is_connected(&self) -> bool {
        self.read_connected || self.write_connected
    }

    pub fn can_write(&self) -> bool {
        self.write_connected
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(SocketIo::peer_addr)
    }

    pub fn socket(&self) -> Option<&S> {
        self.socket.as_ref()
    }
}

impl<S: SocketIo> Drop for TcpClient<S> {
    fn drop(&mut self) {
        self.close();
    }
}
