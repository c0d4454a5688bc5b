/*!
 * Network Module
 *
 * Stream sockets with per-direction liveness, and a buffered channel that
 * stages bytes in FIFO pipes until an external readiness notifier reports
 * the socket ready.
 *
 * # Layers
 *
 * - `SocketIo`: single-shot send / recv / peek over a raw stream
 * - `TcpClient`: owns the socket, tracks read/write liveness
 * - `BufferedTcpClient`: inbound/outbound pipes plus event hooks
 *
 * This module never polls; `on_readable` / `on_writable` are driven by the
 * caller's event loop.
 */

mod buffered;
mod client;
mod config;
mod host;
mod socket;
mod traits;
mod types;

// Re-export public API
pub use buffered::{BufferedTcpClient, ChannelHook};
pub use client::TcpClient;
pub use config::ChannelConfig;
pub use host::NetworkHost;
pub use socket::TcpSocket;
pub use traits::SocketIo;
pub use types::{ChannelStats, NetError, NetResult, ReadProbe};
