/*!
 * Network Types
 * Errors, probes and statistics for stream channels
 */

use crate::core::types::Size;
use crate::ipc::PipeStats;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Result type for socket operations
pub type NetResult<T> = Result<T, NetError>;

/// Network error types
#[derive(Debug, Error, Diagnostic)]
pub enum NetError {
    #[error("Failed to resolve {host}: {source}")]
    #[diagnostic(
        code(net::resolve_failed),
        help("Check the host name and that a resolver is reachable.")
    )]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("No addresses found for {0}")]
    #[diagnostic(code(net::no_address))]
    NoAddress(String),

    #[error("Failed to connect to {addr}: {source}")]
    #[diagnostic(
        code(net::connect_failed),
        help("The peer may be down or refusing connections.")
    )]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to configure socket: {0}")]
    #[diagnostic(code(net::configure_failed))]
    Configure(#[source] io::Error),

    #[error("Socket is not connected in this direction")]
    #[diagnostic(
        code(net::not_connected),
        help("Check is_read_connected / is_write_connected before I/O.")
    )]
    NotConnected,

    #[error("Operation would block")]
    #[diagnostic(code(net::would_block))]
    WouldBlock,

    #[error("Send failed: {0}")]
    #[diagnostic(code(net::send_failed), help("The write side is now closed."))]
    Send(#[source] io::Error),

    #[error("Receive failed: {0}")]
    #[diagnostic(code(net::receive_failed), help("The read side is now closed."))]
    Receive(#[source] io::Error),
}

/// Point-in-time OS view of the read side
///
/// Diagnostic only: the cached liveness flags are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadProbe {
    /// Bytes are waiting (count capped at the peek window)
    Pending(Size),
    /// Open, nothing waiting
    Idle,
    /// Peer shut down its write side; a receive would return 0
    PeerClosed,
    /// The socket was already closed locally
    Closed,
    /// The OS reported an error
    Error(std::io::ErrorKind),
}

/// Channel statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelStats {
    pub read_connected: bool,
    pub write_connected: bool,
    pub inbound: PipeStats,
    pub outbound: PipeStats,
}
