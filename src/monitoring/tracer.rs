/*!
 * Structured Tracing
 * Subscriber setup and operation spans for the I/O layer
 */

use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::core::IoConfig;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - VFS_IO_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is kept.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = IoConfig::from_env().trace_json;
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    } else {
        debug!("Tracing subscriber already installed");
    }
    installed
}

/// Span scoping one Vfs operation on `path`
pub fn span_operation(op: &str, path: &str) -> Span {
    span!(Level::DEBUG, "vfs_op", op = op, path = path)
}
