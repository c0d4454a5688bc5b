/*!
 * Structured Tracing
 * Subscriber setup and span helpers built on the tracing crate
 *
 * Features:
 * - `RUST_LOG` filtering (default: info)
 * - JSON output for log shippers
 * - Per-connection spans so channel events carry the peer address
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::net::SocketAddr;
use tracing::{info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - IO_KERNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span for all events raised while driving one connection
pub fn span_channel(peer: Option<SocketAddr>) -> Span {
    match peer {
        Some(peer) => span!(Level::DEBUG, "channel", peer = %peer),
        None => span!(Level::DEBUG, "channel", peer = "unknown"),
    }
}
