/*!
 * VFS Traits
 * Capability contract every filesystem backend implements
 */

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::process::ProcessHandler;
use super::types::{VfsOpenMode, VfsStat};
use crate::core::{VfsError, VfsResult};
use crate::stream::Stream;

/// Lazy sequence of absolute child paths
pub type VfsListing = BoxStream<'static, VfsResult<String>>;

/// Virtual filesystem capability
///
/// Paths are virtual, forward-slash and absolute (see [`super::paths`]).
/// Every operation may suspend; blocking native calls never run on the
/// caller's execution context. Backends override what they support and the
/// rest report `NotSupported`.
///
/// Boolean operations return `false` for ordinary failures (already exists,
/// not found, not empty); native faults are raised as `IoFault`.
#[async_trait]
pub trait Vfs: Send + Sync + std::fmt::Debug {
    /// Backend location of `path` (host path for local backends)
    fn absolute_path(&self, path: &str) -> VfsResult<String> {
        Ok(path.to_string())
    }

    /// Open a positioned stream over `path`
    async fn open(&self, path: &str, mode: VfsOpenMode) -> VfsResult<Stream> {
        let _ = (path, mode);
        Err(VfsError::not_supported("open", self.name()))
    }

    /// Metadata snapshot; a missing path yields `exists == false`
    async fn stat(&self, path: &str) -> VfsResult<VfsStat> {
        let _ = path;
        Err(VfsError::not_supported("stat", self.name()))
    }

    /// Direct children of a directory, produced one at a time
    async fn list(&self, path: &str) -> VfsResult<VfsListing> {
        let _ = path;
        Err(VfsError::not_supported("list", self.name()))
    }

    async fn mkdir(&self, path: &str) -> VfsResult<bool> {
        let _ = path;
        Err(VfsError::not_supported("mkdir", self.name()))
    }

    /// Remove a file or an empty directory
    async fn delete(&self, path: &str) -> VfsResult<bool> {
        let _ = path;
        Err(VfsError::not_supported("delete", self.name()))
    }

    async fn rename(&self, src: &str, dst: &str) -> VfsResult<bool> {
        let _ = (src, dst);
        Err(VfsError::not_supported("rename", self.name()))
    }

    /// Truncate or extend a file to exactly `size` bytes
    async fn set_size(&self, path: &str, size: u64) -> VfsResult<()> {
        let _ = (path, size);
        Err(VfsError::not_supported("set_size", self.name()))
    }

    /// Run `cmd_and_args` with `path` as working directory
    ///
    /// Output is streamed to `handler` while the process runs and fully
    /// drained before the exit code is returned. A non-zero exit is not an
    /// error; failing to spawn is.
    async fn exec(
        &self,
        path: &str,
        cmd_and_args: &[String],
        handler: &mut dyn ProcessHandler,
    ) -> VfsResult<i32> {
        let _ = (path, cmd_and_args, handler);
        Err(VfsError::not_supported("exec", self.name()))
    }

    /// Backend name for diagnostics
    fn name(&self) -> &str;
}
