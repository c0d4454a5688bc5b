/*!
 * I/O Kernel Library
 * Reader/writer locking and buffered stream channels
 */

pub mod core;
pub mod ipc;
pub mod monitoring;
pub mod net;

// Re-exports
pub use crate::core::sync::{FairnessPolicy, LockConfig, LockError, ReaderWriterLock};
pub use ipc::{Pipe, PipeError, PipeStats};
pub use monitoring::{init_tracing, span_channel};
pub use net::{
    BufferedTcpClient, ChannelConfig, NetError, NetworkHost, ReadProbe, SocketIo, TcpClient,
    TcpSocket,
};
