/*!
 * System Limits and Constants
 *
 * Centralized location for sizes, thresholds and magic numbers used by the
 * stream, codec and VFS layers.
 */

// =============================================================================
// CODEC LIMITS
// =============================================================================

/// Maximum base-128 groups for a 32-bit varint magnitude
pub const VARINT_MAX_GROUPS: usize = 5;

/// Continuation bit of a varint group
pub const VARINT_CONTINUATION: u8 = 0x80;

/// Payload mask of a varint group
pub const VARINT_PAYLOAD: u8 = 0x7f;

// =============================================================================
// STREAM LIMITS
// =============================================================================

/// Chunk size used by `Stream::copy_to` and whole-stream reads
pub const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Default upper bound for delimiter scanning (`read_until`, `read_line`)
/// Matches the request-field limit of line-oriented protocol consumers
pub const DEFAULT_SCAN_LIMIT: usize = 8190;

/// Initial capacity of an empty memory-backed stream
pub const MEMORY_INITIAL_CAPACITY: usize = 4096;

// =============================================================================
// DISPATCHER LIMITS
// =============================================================================

/// Default number of concurrent blocking jobs on the worker dispatcher
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Hard cap on configured worker threads
pub const MAX_WORKER_THREADS: usize = 512;

// =============================================================================
// PROCESS LIMITS
// =============================================================================

/// Read chunk for subprocess stdout/stderr pipes
pub const EXEC_CHUNK_SIZE: usize = 8 * 1024;

/// Output chunks buffered between the process pump and the handler
pub const EXEC_CHUNK_BACKLOG: usize = 16;
