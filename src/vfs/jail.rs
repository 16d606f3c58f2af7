/*!
 * Jailed VFS
 * Decorator confining every path to a subtree of another Vfs
 */

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tracing::warn;

use super::paths;
use super::process::ProcessHandler;
use super::traits::{Vfs, VfsListing};
use super::types::{VfsOpenMode, VfsStat};
use crate::core::{VfsError, VfsResult};
use crate::stream::Stream;

/// Vfs restricted to `root` of its parent
///
/// Paths given to a jail are relative to the jail root. Every call
/// re-resolves and re-validates the path: `..` is clamped at the jail root
/// and absolute paths are re-rooted under it, so nothing outside `root` is
/// ever reached. The parent Vfs is left untouched.
#[derive(Debug, Clone)]
pub struct JailedVfs {
    parent: Arc<dyn Vfs>,
    root: String,
}

impl JailedVfs {
    pub fn new(parent: Arc<dyn Vfs>, root: &str) -> VfsResult<Self> {
        Ok(Self {
            parent,
            root: paths::normalize(root)?,
        })
    }

    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[inline]
    pub fn parent(&self) -> &Arc<dyn Vfs> {
        &self.parent
    }

    /// Jail-relative path to a parent path inside `root`
    pub fn resolve(&self, path: &str) -> VfsResult<String> {
        let inner = paths::normalize(path)?;
        let full = if self.root == paths::ROOT {
            inner
        } else if inner == paths::ROOT {
            self.root.clone()
        } else {
            format!("{}{}", self.root, inner)
        };

        if !paths::is_within(&full, &self.root) {
            warn!(path, root = %self.root, "Rejected path escaping jail");
            return Err(VfsError::InvalidArgument(format!(
                "path escapes jail {}: {}",
                self.root, path
            )));
        }
        Ok(full)
    }

    /// Parent path back to a jail-relative path
    fn unjail(root: &str, full: &str) -> String {
        if root == paths::ROOT {
            return full.to_string();
        }
        match full.strip_prefix(root) {
            Some("") => paths::ROOT.to_string(),
            Some(rest) if rest.starts_with(paths::SEPARATOR) => rest.to_string(),
            _ => full.to_string(),
        }
    }
}

#[async_trait]
impl Vfs for JailedVfs {
    fn absolute_path(&self, path: &str) -> VfsResult<String> {
        self.parent.absolute_path(&self.resolve(path)?)
    }

    async fn open(&self, path: &str, mode: VfsOpenMode) -> VfsResult<Stream> {
        self.parent.open(&self.resolve(path)?, mode).await
    }

    async fn stat(&self, path: &str) -> VfsResult<VfsStat> {
        let mut stat = self.parent.stat(&self.resolve(path)?).await?;
        stat.path = Self::unjail(&self.root, &stat.path);
        Ok(stat)
    }

    async fn list(&self, path: &str) -> VfsResult<VfsListing> {
        let root = self.root.clone();
        let listing = self.parent.list(&self.resolve(path)?).await?;
        Ok(listing
            .map(move |child| child.map(|full| Self::unjail(&root, &full)))
            .boxed())
    }

    async fn mkdir(&self, path: &str) -> VfsResult<bool> {
        self.parent.mkdir(&self.resolve(path)?).await
    }

    async fn delete(&self, path: &str) -> VfsResult<bool> {
        self.parent.delete(&self.resolve(path)?).await
    }

    async fn rename(&self, src: &str, dst: &str) -> VfsResult<bool> {
        self.parent
            .rename(&self.resolve(src)?, &self.resolve(dst)?)
            .await
    }

    async fn set_size(&self, path: &str, size: u64) -> VfsResult<()> {
        self.parent.set_size(&self.resolve(path)?, size).await
    }

    async fn exec(
        &self,
        path: &str,
        cmd_and_args: &[String],
        handler: &mut dyn ProcessHandler,
    ) -> VfsResult<i32> {
        self.parent
            .exec(&self.resolve(path)?, cmd_and_args, handler)
            .await
    }

    fn name(&self) -> &str {
        "jail"
    }
}
