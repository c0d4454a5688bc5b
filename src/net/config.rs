/*!
 * Channel Configuration
 *
 * Runtime configuration for TCP clients and buffered channels
 */

use crate::core::limits::{
    DEFAULT_CHANNEL_PIPE_LIMIT, DEFAULT_MAX_READ_CHUNK, ENV_CONNECT_TIMEOUT_MS,
    ENV_MAX_READ_CHUNK, ENV_PIPE_LIMIT, MAX_READ_CHUNK, STANDARD_CONNECT_TIMEOUT,
};
use crate::core::types::Size;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Buffered channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Largest receive performed by one readiness event
    pub max_read_chunk: Size,
    /// Byte limit of the inbound pipe (`None` = unbounded)
    pub inbound_limit: Option<Size>,
    /// Byte limit of the outbound pipe (`None` = unbounded)
    pub outbound_limit: Option<Size>,
    /// Connect timeout (`None` = blocking connect)
    pub connect_timeout: Option<Duration>,
    /// Disable Nagle's algorithm on connected sockets
    pub nodelay: bool,
    /// Put connected sockets in non-blocking mode
    pub nonblocking: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_read_chunk: DEFAULT_MAX_READ_CHUNK,
            inbound_limit: Some(DEFAULT_CHANNEL_PIPE_LIMIT),
            outbound_limit: Some(DEFAULT_CHANNEL_PIPE_LIMIT),
            connect_timeout: Some(STANDARD_CONNECT_TIMEOUT),
            nodelay: true,
            nonblocking: true,
        }
    }
}

impl ChannelConfig {
    /// Pipes grow without limit; the caller bounds memory
    pub const fn unbounded() -> Self {
        Self {
            max_read_chunk: DEFAULT_MAX_READ_CHUNK,
            inbound_limit: None,
            outbound_limit: None,
            connect_timeout: Some(STANDARD_CONNECT_TIMEOUT),
            nodelay: true,
            nonblocking: true,
        }
    }

    /// Blocking sockets, for callers doing their own thread-per-connection I/O
    pub fn blocking() -> Self {
        Self {
            nonblocking: false,
            ..Self::default()
        }
    }

    /// Defaults overridden by `IO_KERNEL_*` environment variables
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(chunk) = env_value::<Size>(ENV_MAX_READ_CHUNK) {
            config.max_read_chunk = chunk;
        }
        if let Some(limit) = env_value::<Size>(ENV_PIPE_LIMIT) {
            let limit = (limit > 0).then_some(limit);
            config.inbound_limit = limit;
            config.outbound_limit = limit;
        }
        if let Some(ms) = env_value::<u64>(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        config.validated()
    }

    /// Clamp values into their supported ranges
    pub fn validated(mut self) -> Self {
        self.max_read_chunk = self.max_read_chunk.clamp(1, MAX_READ_CHUNK);
        self
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_validated_clamps_chunk() {
        let config = ChannelConfig {
            max_read_chunk: 0,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.max_read_chunk, 1);

        let config = ChannelConfig {
            max_read_chunk: usize::MAX,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.max_read_chunk, MAX_READ_CHUNK);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var(ENV_MAX_READ_CHUNK, "1024");
        std::env::set_var(ENV_PIPE_LIMIT, "0");
        std::env::set_var(ENV_CONNECT_TIMEOUT_MS, "250");

        let config = ChannelConfig::from_env();

        std::env::remove_var(ENV_MAX_READ_CHUNK);
        std::env::remove_var(ENV_PIPE_LIMIT);
        std::env::remove_var(ENV_CONNECT_TIMEOUT_MS);

        assert_eq!(config.max_read_chunk, 1024);
        assert_eq!(config.inbound_limit, None);
        assert_eq!(config.outbound_limit, None);
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        std::env::set_var(ENV_MAX_READ_CHUNK, "lots");
        let config = ChannelConfig::from_env();
        std::env::remove_var(ENV_MAX_READ_CHUNK);

        assert_eq!(config.max_read_chunk, DEFAULT_MAX_READ_CHUNK);
    }
}
