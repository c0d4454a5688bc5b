/*!
 * Buffered TCP Client
 *
 * Decouples "the application has bytes to send / wants bytes" from "the
 * socket is ready right now". The application stages bytes in two pipes;
 * an external readiness notifier drains and fills them by calling
 * [`on_writable`](BufferedTcpClient::on_writable) and
 * [`on_readable`](BufferedTcpClient::on_readable).
 *
 * # Threading
 *
 * Every method takes `&self`. The pipes and the client each sit behind a
 * `parking_lot::Mutex`, so the application may queue from any thread while
 * the I/O thread drives readiness events. Lock order is pipe, then client.
 * Hooks run with no internal lock held and may call back into the channel.
 */

use super::client::TcpClient;
use super::config::ChannelConfig;
use super::host::NetworkHost;
use super::socket::TcpSocket;
use super::traits::SocketIo;
use super::types::{ChannelStats, NetError, NetResult, ReadProbe};
use crate::core::types::Size;
use crate::ipc::{Pipe, PipeError};
use bytes::Bytes;
use parking_lot::Mutex;
use std::net::SocketAddr;
use tracing::{debug, trace, warn};

/// Callback invoked synchronously on the thread that raised the event
pub type ChannelHook<S> = Box<dyn Fn(&BufferedTcpClient<S>) + Send + Sync>;

struct Hooks<S: SocketIo> {
    readable: Option<ChannelHook<S>>,
    writable: Option<ChannelHook<S>>,
    read_closed: Option<ChannelHook<S>>,
    write_closed: Option<ChannelHook<S>>,
}

impl<S: SocketIo> Default for Hooks<S> {
    fn default() -> Self {
        Self {
            readable: None,
            writable: None,
            read_closed: None,
            write_closed: None,
        }
    }
}

pub struct BufferedTcpClient<S: SocketIo = TcpSocket> {
    client: Mutex<TcpClient<S>>,
    inbound: Mutex<Pipe>,
    outbound: Mutex<Pipe>,
    hooks: Hooks<S>,
    max_read_chunk: Size,
}

impl<S: SocketIo> std::fmt::Debug for BufferedTcpClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Pipes first, then the client, each guard released before the next
        let pending_inbound = self.pending_inbound();
        let pending_outbound = self.pending_outbound();
        let client = format!("{:?}", &*self.client.lock());
        f.debug_struct("BufferedTcpClient")
            .field("client", &format_args!("{client}"))
            .field("pending_inbound", &pending_inbound)
            .field("pending_outbound", &pending_outbound)
            .finish()
    }
}

fn new_pipe(limit: Option<Size>) -> Pipe {
    match limit {
        Some(limit) => Pipe::with_limit(limit),
        None => Pipe::new(),
    }
}

impl BufferedTcpClient<TcpSocket> {
    pub fn connect(host: &NetworkHost, config: &ChannelConfig) -> NetResult<Self> {
        let client = TcpClient::connect(host, config)?;
        Ok(Self::new(client, config))
    }
}

impl<S: SocketIo> BufferedTcpClient<S> {
    pub fn new(client: TcpClient<S>, config: &ChannelConfig) -> Self {
        Self {
            client: Mutex::new(client),
            inbound: Mutex::new(new_pipe(config.inbound_limit)),
            outbound: Mutex::new(new_pipe(config.outbound_limit)),
            hooks: Hooks::default(),
            max_read_chunk: config.max_read_chunk.max(1),
        }
    }

    pub fn from_socket(socket: S, config: &ChannelConfig) -> Self {
        Self::new(TcpClient::from_socket(socket, config), config)
    }

    // =========================================================================
    // HOOKS
    // =========================================================================

    pub fn set_readable_hook(&mut self, hook: impl Fn(&Self) + Send + Sync + 'static) {
        self.hooks.readable = Some(Box::new(hook));
    }

    pub fn set_writable_hook(&mut self, hook: impl Fn(&Self) + Send + Sync + 'static) {
        self.hooks.writable = Some(Box::new(hook));
    }

    pub fn set_read_closed_hook(&mut self, hook: impl Fn(&Self) + Send + Sync + 'static) {
        self.hooks.read_closed = Some(Box::new(hook));
    }

    pub fn set_write_closed_hook(&mut self, hook: impl Fn(&Self) + Send + Sync + 'static) {
        self.hooks.write_closed = Some(Box::new(hook));
    }

    pub fn with_readable_hook(mut self, hook: impl Fn(&Self) + Send + Sync + 'static) -> Self {
        self.set_readable_hook(hook);
        self
    }

    pub fn with_writable_hook(mut self, hook: impl Fn(&Self) + Send + Sync + 'static) -> Self {
        self.set_writable_hook(hook);
        self
    }

    pub fn with_read_closed_hook(mut self, hook: impl Fn(&Self) + Send + Sync + 'static) -> Self {
        self.set_read_closed_hook(hook);
        self
    }

    pub fn with_write_closed_hook(mut self, hook: impl Fn(&Self) + Send + Sync + 'static) -> Self {
        self.set_write_closed_hook(hook);
        self
    }

    #[inline]
    fn fire(&self, hook: &Option<ChannelHook<S>>) {
        if let Some(hook) = hook {
            hook(self);
        }
    }

    // =========================================================================
    // APPLICATION SIDE
    // =========================================================================

    /// Stage bytes for sending; touches no socket
    pub fn queue_write(&self, data: &[u8]) -> Result<Size, PipeError> {
        self.outbound.lock().write(data)
    }

    pub fn queue_write_str(&self, text: &str) -> Result<Size, PipeError> {
        self.queue_write(text.as_bytes())
    }

    /// Take up to `buf.len()` received bytes; 0 if none are staged
    pub fn queue_read(&self, buf: &mut [u8]) -> Size {
        self.inbound.lock().read(buf)
    }

    pub fn queue_read_bytes(&self, max: Size) -> Bytes {
        self.inbound.lock().read_bytes(max)
    }

    // =========================================================================
    // STREAM-HANDLER SIDE
    // =========================================================================

    /// Inject bytes as if they had been received
    pub fn write_to_input_buffer(&self, data: &[u8]) -> Result<Size, PipeError> {
        self.inbound.lock().write(data)
    }

    /// Take staged outbound bytes without sending them
    pub fn read_from_output_buffer(&self, buf: &mut [u8]) -> Size {
        self.outbound.lock().read(buf)
    }

    // =========================================================================
    // READINESS EVENTS
    // =========================================================================

    /// The socket can accept a send
    ///
    /// Runs the writable hook, then offers the whole outbound pipe to one
    /// send and discards exactly what the OS accepted.
    pub fn on_writable(&self) {
        self.fire(&self.hooks.writable);

        let write_closed = {
            let mut outbound = self.outbound.lock();
            if outbound.is_empty() {
                return;
            }

            let mut client = self.client.lock();
            let was_open = client.is_write_connected();
            let result = client.send(outbound.buffer());
            let write_closed = was_open && !client.is_write_connected();
            drop(client);

            match result {
                Ok(sent) => {
                    outbound.discard(sent);
                    trace!(sent, remaining = outbound.peek_size(), "outbound drained");
                }
                Err(NetError::NotConnected) => {
                    trace!(pending = outbound.peek_size(), "writable event on closed write side");
                }
                Err(e) => {
                    warn!(error = %e, pending = outbound.peek_size(), "outbound drain failed");
                }
            }
            write_closed
        };

        if write_closed {
            self.fire(&self.hooks.write_closed);
        }
    }

    /// The socket has bytes (or an end-of-stream) to deliver
    ///
    /// Runs the readable hook, then performs one non-blocking receive
    /// straight into the inbound pipe, taking whatever the OS holds up to
    /// `max_read_chunk` and the pipe's free space. When the inbound pipe is
    /// full the bytes are left in the socket.
    pub fn on_readable(&self) {
        self.fire(&self.hooks.readable);

        let read_closed = {
            let mut inbound = self.inbound.lock();
            let space = inbound.available_space().unwrap_or(Size::MAX);
            if space == 0 {
                debug!(buffered = inbound.peek_size(), "inbound pipe full, leaving bytes in socket");
                return;
            }

            let mut client = self.client.lock();
            if !client.is_read_connected() {
                trace!("readable event on closed read side");
                return;
            }
            let want = self.max_read_chunk.min(space);
            let result = inbound.fill_with(want, |tail| client.receive(tail));
            let read_closed = !client.is_read_connected();
            drop(client);

            match result {
                Ok(0) => {}
                Ok(received) => {
                    trace!(received, buffered = inbound.peek_size(), "inbound filled");
                }
                Err(NetError::WouldBlock) => trace!("spurious readable event"),
                Err(e) => warn!(error = %e, "inbound fill failed"),
            }
            read_closed
        };

        if read_closed {
            self.fire(&self.hooks.read_closed);
        }
    }

    /// The read direction closed; clears the flag and runs the hook once
    pub fn on_read_closed(&self) {
        let closed_now = self.client.lock().mark_read_closed();
        if closed_now {
            debug!("read side closed");
            self.fire(&self.hooks.read_closed);
        }
    }

    /// The write direction closed; clears the flag and runs the hook once
    pub fn on_write_closed(&self) {
        let closed_now = self.client.lock().mark_write_closed();
        if closed_now {
            debug!("write side closed");
            self.fire(&self.hooks.write_closed);
        }
    }

    /// Close the socket, running the close hook of each side still open
    ///
    /// Staged bytes stay readable through `queue_read`.
    pub fn close(&self) {
        let (read_was_open, write_was_open) = {
            let mut client = self.client.lock();
            let state = (client.is_read_connected(), client.is_write_connected());
            client.close();
            state
        };

        if read_was_open {
            self.fire(&self.hooks.read_closed);
        }
        if write_was_open {
            self.fire(&self.hooks.write_closed);
        }
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn is_read_connected(&self) -> bool {
        self.client.lock().is_read_connected()
    }

    pub fn is_write_connected(&self) -> bool {
        self.client.lock().is_write_connected()
    }

    pub fn is_connected(&self) -> bool {
        self.client.lock().is_connected()
    }

    /// Diagnostic OS probe; see [`TcpClient::probe_read_side`]
    pub fn probe_read_side(&self) -> ReadProbe {
        self.client.lock().probe_read_side()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.client.lock().peer_addr()
    }

    pub fn pending_inbound(&self) -> Size {
        self.inbound.lock().peek_size()
    }

    pub fn pending_outbound(&self) -> Size {
        self.outbound.lock().peek_size()
    }

    pub fn stats(&self) -> ChannelStats {
        let inbound = self.inbound.lock().stats();
        let outbound = self.outbound.lock().stats();
        let client = self.client.lock();
        ChannelStats {
            read_connected: client.is_read_connected(),
            write_connected: client.is_write_connected(),
            inbound,
            outbound,
        }
    }
}
