/*!
 * VFS File Handle
 * Immutable (vfs, path) value with navigation and content helpers
 */

use futures::stream::{BoxStream, StreamExt};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::jail::JailedVfs;
use super::local::LocalVfs;
use super::paths;
use super::process::ProcessHandler;
use super::traits::Vfs;
use super::types::{VfsOpenMode, VfsStat};
use crate::codec::strings::decode_utf8;
use crate::core::VfsResult;
use crate::stream::Stream;

/// A path bound to the Vfs that owns it
///
/// Navigation never touches the backend and always yields a new value.
#[derive(Clone)]
pub struct VfsFile {
    vfs: Arc<dyn Vfs>,
    path: String,
}

impl fmt::Debug for VfsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfsFile")
            .field("vfs", &self.vfs.name())
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for VfsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vfs.name(), self.path)
    }
}

impl VfsFile {
    pub fn new(vfs: Arc<dyn Vfs>, path: &str) -> VfsResult<Self> {
        Ok(Self {
            vfs,
            path: paths::normalize(path)?,
        })
    }

    /// Root of `vfs`
    pub fn root(vfs: Arc<dyn Vfs>) -> Self {
        Self {
            vfs,
            path: paths::ROOT.to_string(),
        }
    }

    #[inline]
    pub fn vfs(&self) -> &Arc<dyn Vfs> {
        &self.vfs
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Resolve `relative` against this path
    ///
    /// `..` is clamped at the namespace root and an absolute `relative`
    /// replaces the path entirely.
    pub fn get(&self, relative: &str) -> VfsResult<VfsFile> {
        Ok(Self {
            vfs: self.vfs.clone(),
            path: paths::combine(&self.path, relative)?,
        })
    }

    pub fn parent(&self) -> VfsFile {
        Self {
            vfs: self.vfs.clone(),
            path: paths::parent(&self.path).to_string(),
        }
    }

    pub fn basename(&self) -> &str {
        paths::basename(&self.path)
    }

    pub fn extension(&self) -> &str {
        paths::extension(&self.path)
    }

    pub fn path_without_extension(&self) -> &str {
        paths::without_extension(&self.path)
    }

    /// Backend location (host path for local files)
    pub fn absolute_path(&self) -> VfsResult<String> {
        self.vfs.absolute_path(&self.path)
    }

    /// New root confined to this path
    pub fn jail(&self) -> VfsResult<VfsFile> {
        let jail = JailedVfs::new(self.vfs.clone(), &self.path)?;
        Ok(Self::root(Arc::new(jail)))
    }

    // ========================================================================
    // Backend Operations
    // ========================================================================

    pub async fn open(&self, mode: VfsOpenMode) -> VfsResult<Stream> {
        self.vfs.open(&self.path, mode).await
    }

    pub async fn stat(&self) -> VfsResult<VfsStat> {
        self.vfs.stat(&self.path).await
    }

    /// Direct children, produced lazily
    pub async fn list(&self) -> VfsResult<BoxStream<'static, VfsResult<VfsFile>>> {
        let vfs = self.vfs.clone();
        let listing = self.vfs.list(&self.path).await?;
        Ok(listing
            .map(move |child| {
                child.map(|path| VfsFile {
                    vfs: vfs.clone(),
                    path,
                })
            })
            .boxed())
    }

    pub async fn mkdir(&self) -> VfsResult<bool> {
        self.vfs.mkdir(&self.path).await
    }

    /// Create this directory and any missing ancestors
    pub async fn mkdirs(&self) -> VfsResult<()> {
        let mut current = paths::ROOT.to_string();
        for segment in self.path.split(paths::SEPARATOR).filter(|s| !s.is_empty()) {
            current = paths::child(&current, segment);
            if !self.vfs.stat(&current).await?.exists {
                self.vfs.mkdir(&current).await?;
            }
        }
        Ok(())
    }

    pub async fn ensure_parent_dir(&self) -> VfsResult<()> {
        self.parent().mkdirs().await
    }

    pub async fn delete(&self) -> VfsResult<bool> {
        self.vfs.delete(&self.path).await
    }

    /// Rename within the same Vfs; `dst` is resolved like [`VfsFile::get`]
    pub async fn rename_to(&self, dst: &str) -> VfsResult<bool> {
        let target = paths::combine(paths::parent(&self.path), dst)?;
        self.vfs.rename(&self.path, &target).await
    }

    pub async fn set_size(&self, size: u64) -> VfsResult<()> {
        self.vfs.set_size(&self.path, size).await
    }

    /// Run a process with this directory as working directory
    pub async fn exec(
        &self,
        cmd_and_args: &[String],
        handler: &mut dyn ProcessHandler,
    ) -> VfsResult<i32> {
        self.vfs.exec(&self.path, cmd_and_args, handler).await
    }

    // ========================================================================
    // Content Helpers
    // ========================================================================

    pub async fn exists(&self) -> VfsResult<bool> {
        Ok(self.stat().await?.exists)
    }

    pub async fn is_directory(&self) -> VfsResult<bool> {
        Ok(self.stat().await?.is_directory)
    }

    pub async fn size(&self) -> VfsResult<u64> {
        Ok(self.stat().await?.size)
    }

    pub async fn read_bytes(&self) -> VfsResult<Vec<u8>> {
        let mut stream = self.open(VfsOpenMode::Read).await?;
        let result = stream.read_all().await;
        let closed = stream.close().await;
        let data = result?;
        closed?;
        Ok(data)
    }

    /// Replace the contents, creating the file if needed
    pub async fn write_bytes(&self, data: &[u8]) -> VfsResult<()> {
        let mut stream = self.open(VfsOpenMode::CreateOrTruncate).await?;
        let result = stream.write(data).await;
        let closed = stream.close().await;
        result?;
        closed
    }

    pub async fn read_string(&self) -> VfsResult<String> {
        decode_utf8(self.read_bytes().await?)
    }

    pub async fn write_string(&self, value: &str) -> VfsResult<()> {
        self.write_bytes(value.as_bytes()).await
    }
}

/// Local filesystem rooted at `root`
pub fn local_vfs(root: impl Into<PathBuf>) -> VfsFile {
    VfsFile::root(Arc::new(LocalVfs::new(root)))
}

/// Local filesystem at `root` behind a jail
pub fn jailed_local_vfs(root: impl Into<PathBuf>) -> VfsResult<VfsFile> {
    local_vfs(root).jail()
}

/// Local filesystem rooted at the system temp directory
pub fn temp_vfs() -> VfsFile {
    local_vfs(std::env::temp_dir())
}
