/*!
 * TCP Socket
 * `SocketIo` over `std::net::TcpStream`
 */

use super::config::ChannelConfig;
use super::host::NetworkHost;
use super::traits::SocketIo;
use super::types::{NetError, NetResult};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use tracing::{debug, warn};

/// Connected TCP stream configured for readiness-driven I/O
#[derive(Debug)]
pub struct TcpSocket {
    stream: TcpStream,
    nonblocking: bool,
}

impl TcpSocket {
    /// Adopt an already connected stream (e.g. from `TcpListener::accept`)
    pub fn new(stream: TcpStream, config: &ChannelConfig) -> NetResult<Self> {
        stream.set_nodelay(config.nodelay).map_err(NetError::Configure)?;
        stream
            .set_nonblocking(config.nonblocking)
            .map_err(NetError::Configure)?;

        Ok(Self {
            stream,
            nonblocking: config.nonblocking,
        })
    }

    /// Resolve `host` and connect to the first address that accepts
    pub fn connect(host: &NetworkHost, config: &ChannelConfig) -> NetResult<Self> {
        let mut last_error = None;

        for addr in host.resolve()? {
            let attempt = match config.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };

            match attempt {
                Ok(stream) => {
                    debug!(%addr, "connected");
                    return Self::new(stream, config);
                }
                Err(e) => {
                    warn!(%addr, error = %e, "connect attempt failed");
                    last_error = Some(NetError::Connect {
                        addr: addr.to_string(),
                        source: e,
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| NetError::NoAddress(host.to_string())))
    }

    /// The underlying stream, for registering with a readiness notifier
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }

    pub fn is_nonblocking(&self) -> bool {
        self.nonblocking
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.stream.local_addr().ok()
    }

    pub fn into_inner(self) -> TcpStream {
        self.stream
    }
}

impl SocketIo for TcpSocket {
    fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        self.stream.write(data)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    fn peek(&self, buf: &mut [u8]) -> io::Result<usize> {
        if self.nonblocking {
            return self.stream.peek(buf);
        }

        self.stream.set_nonblocking(true)?;
        let result = self.stream.peek(buf);
        self.stream.set_nonblocking(false)?;
        result
    }

    fn shutdown(&mut self, how: Shutdown) -> io::Result<()> {
        self.stream.shutdown(how)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.peer_addr().ok()
    }
}
