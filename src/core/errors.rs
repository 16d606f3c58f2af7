/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Result of any stream, codec or VFS operation
///
/// # Must Use
/// I/O operations can fail and must be handled to prevent data loss
#[must_use = "I/O operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// Errors shared by every backend, stream and VFS operation
///
/// A missing path is never an error: `stat` reports it through
/// `VfsStat::exists` and boolean operations return `false`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Not supported: {0}")]
    #[diagnostic(
        code(vfs::not_supported),
        help("This backend does not implement the operation.")
    )]
    NotSupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(vfs::invalid_argument))]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("End of data: needed {needed} bytes, got {got}")]
    #[diagnostic(
        code(vfs::end_of_data),
        help("The stream ended before a fixed-width or exact read was satisfied.")
    )]
    EndOfData { needed: u64, got: u64 },

    #[error("I/O fault: {0}")]
    #[diagnostic(
        code(vfs::io_fault),
        help("The native backend failed. Check permissions, disk state and the path.")
    )]
    IoFault(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// Wrap a native I/O error with the operation that produced it
    pub fn io(err: std::io::Error, context: impl Into<String>) -> Self {
        VfsError::IoFault(format!("{}: {}", context.into(), err))
    }

    /// Error for an operation the backend does not implement
    pub fn not_supported(op: &str, backend: &str) -> Self {
        VfsError::NotSupported(format!("{} on {}", op, backend))
    }

    #[inline]
    pub fn end_of_data(needed: usize, got: usize) -> Self {
        VfsError::EndOfData {
            needed: needed as u64,
            got: got as u64,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, VfsError::EndOfData { .. })
    }
}

/// Deserialize and validate non-empty string for error messages
fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
