/*!
 * System Limits and Constants
 *
 * Centralized location for buffer sizes, timeouts and environment keys.
 * Organized by domain for maintainability and discoverability.
 *
 * - Performance-critical constants are marked with [PERF]
 * - Memory-bounding constants are marked with [MEMORY]
 */

use std::time::Duration;

// =============================================================================
// PIPE LIMITS
// =============================================================================

/// Initial pipe allocation (4KB)
/// [PERF] Most stream messages fit without a regrow
pub const DEFAULT_PIPE_INITIAL_CAPACITY: usize = 4 * 1024;

/// Default byte limit for a channel's pipes (16MB)
/// [MEMORY] Bounds growth when the peer stops draining
pub const DEFAULT_CHANNEL_PIPE_LIMIT: usize = 16 * 1024 * 1024;

// =============================================================================
// NETWORK LIMITS
// =============================================================================

/// Largest single receive performed by one readiness event (64KB)
/// [PERF] Matches a typical socket receive buffer
pub const DEFAULT_MAX_READ_CHUNK: usize = 64 * 1024;

/// Upper bound accepted from configuration (16MB)
/// [MEMORY] One readiness event never allocates more than this
pub const MAX_READ_CHUNK: usize = 16 * 1024 * 1024;

/// Standard connect timeout (10 seconds)
pub const STANDARD_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Enables JSON log output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "IO_KERNEL_TRACE_JSON";

/// Overrides `ChannelConfig::max_read_chunk`
pub const ENV_MAX_READ_CHUNK: &str = "IO_KERNEL_MAX_READ_CHUNK";

/// Overrides both channel pipe limits; `0` means unlimited
pub const ENV_PIPE_LIMIT: &str = "IO_KERNEL_PIPE_LIMIT";

/// Overrides the connect timeout in milliseconds; `0` means blocking connect
pub const ENV_CONNECT_TIMEOUT_MS: &str = "IO_KERNEL_CONNECT_TIMEOUT_MS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_chunk_bounds() {
        assert!(DEFAULT_MAX_READ_CHUNK <= MAX_READ_CHUNK);
        assert!(DEFAULT_MAX_READ_CHUNK > 0);
    }

    #[test]
    fn test_pipe_limits_consistent() {
        // A full read chunk must always fit in a default pipe
        assert!(DEFAULT_MAX_READ_CHUNK < DEFAULT_CHANNEL_PIPE_LIMIT);
        assert!(DEFAULT_PIPE_INITIAL_CAPACITY <= DEFAULT_CHANNEL_PIPE_LIMIT);
    }
}
