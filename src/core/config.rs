/*!
 * Runtime Configuration
 * Worker pool sizing, exec buffering and log format
 */

use super::errors::{VfsError, VfsResult};
use super::limits::{DEFAULT_WORKER_THREADS, EXEC_CHUNK_SIZE, MAX_WORKER_THREADS};
use serde::{Deserialize, Serialize};

/// I/O layer configuration
///
/// Environment variables (see [`IoConfig::from_env`]):
/// - VFS_IO_WORKERS: concurrent blocking jobs (default: 4)
/// - VFS_IO_EXEC_CHUNK: subprocess pipe read size in bytes (default: 8192)
/// - VFS_IO_TRACE_JSON: JSON log output (default: false)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct IoConfig {
    pub worker_threads: usize,
    pub exec_chunk_size: usize,
    pub trace_json: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_WORKER_THREADS,
            exec_chunk_size: EXEC_CHUNK_SIZE,
            trace_json: false,
        }
    }
}

impl IoConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for unset or unparsable values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            worker_threads: env_parse("VFS_IO_WORKERS").unwrap_or(defaults.worker_threads),
            exec_chunk_size: env_parse("VFS_IO_EXEC_CHUNK").unwrap_or(defaults.exec_chunk_size),
            trace_json: std::env::var("VFS_IO_TRACE_JSON")
                .map(|v| v == "1" || v == "true")
                .unwrap_or(defaults.trace_json),
        }
    }

    /// Set the worker pool size
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_threads = workers;
        self
    }

    /// Validate configured values
    #[must_use = "validation result must be checked"]
    pub fn validate(&self) -> VfsResult<()> {
        if self.worker_threads == 0 || self.worker_threads > MAX_WORKER_THREADS {
            return Err(VfsError::InvalidArgument(format!(
                "worker_threads must be in 1..={}, got {}",
                MAX_WORKER_THREADS, self.worker_threads
            )));
        }
        if self.exec_chunk_size == 0 {
            return Err(VfsError::InvalidArgument(
                "exec_chunk_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
