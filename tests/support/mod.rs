/*!
 * Test Support
 * Scripted in-memory socket for driving channels deterministically
 */

#![allow(dead_code)]

use io_kernel::SocketIo;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::net::{Shutdown, SocketAddr};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What the fake OS does on the next calls
#[derive(Debug, Default)]
pub struct Script {
    /// Bytes the peer has sent and the OS holds for us
    pub inbound: VecDeque<u8>,
    /// Peer shut down its write side once `inbound` is drained
    pub peer_closed: bool,
    /// Everything the OS accepted from us
    pub sent: Vec<u8>,
    /// Max bytes accepted per send (`None` = all)
    pub send_limit: Option<usize>,
    pub send_would_block: bool,
    pub send_error: Option<ErrorKind>,
    pub recv_error: Option<ErrorKind>,
    pub shutdowns: usize,
    pub recv_calls: usize,
    pub send_calls: usize,
    pub peek_calls: usize,
    /// How long `peer_addr` takes to answer
    pub peer_addr_delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ScriptedSocket {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSocket {
    pub fn new() -> (Self, Arc<Mutex<Script>>) {
        let script = Arc::new(Mutex::new(Script::default()));
        (
            Self {
                script: script.clone(),
            },
            script,
        )
    }

    pub fn with_inbound(data: &[u8]) -> (Self, Arc<Mutex<Script>>) {
        let (socket, script) = Self::new();
        script.lock().inbound.extend(data.iter().copied());
        (socket, script)
    }
}

impl SocketIo for ScriptedSocket {
    fn send(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut script = self.script.lock();
        script.send_calls += 1;
        if let Some(kind) = script.send_error {
            return Err(io::Error::from(kind));
        }
        if script.send_would_block {
            return Err(io::Error::from(ErrorKind::WouldBlock));
        }
        let n = data.len().min(script.send_limit.unwrap_or(usize::MAX));
        script.sent.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut script = self.script.lock();
        script.recv_calls += 1;
        if let Some(kind) = script.recv_error {
            return Err(io::Error::from(kind));
        }
        if script.inbound.is_empty() {
            return if script.peer_closed {
                Ok(0)
            } else {
                Err(io::Error::from(ErrorKind::WouldBlock))
            };
        }
        let n = buf.len().min(script.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(script.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn peek(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut script = self.script.lock();
        script.peek_calls += 1;
        if script.inbound.is_empty() {
            return if script.peer_closed {
                Ok(0)
            } else {
                Err(io::Error::from(ErrorKind::WouldBlock))
            };
        }
        let n = buf.len().min(script.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(script.inbound.iter().take(n)) {
            *slot = *byte;
        }
        Ok(n)
    }

    fn shutdown(&mut self, _how: Shutdown) -> io::Result<()> {
        self.script.lock().shutdowns += 1;
        Ok(())
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        let delay = self.script.lock().peer_addr_delay;
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        None
    }
}
