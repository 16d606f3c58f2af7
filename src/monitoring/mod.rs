/*!
 * Monitoring
 * Structured logging for streams and VFS backends
 */

pub mod tracer;

pub use tracer::{init_tracing, span_operation};
