/*!
 * VFS Stat
 * Immutable metadata snapshot
 */

use serde::{Deserialize, Serialize};

/// Metadata snapshot for one path
///
/// A missing path is reported with `exists == false`, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VfsStat {
    pub path: String,
    pub exists: bool,
    pub is_directory: bool,
    pub size: u64,
}

impl VfsStat {
    #[must_use]
    pub fn existing(path: impl Into<String>, is_directory: bool, size: u64) -> Self {
        Self {
            path: path.into(),
            exists: true,
            is_directory,
            size,
        }
    }

    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            is_directory: false,
            size: 0,
        }
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.exists && !self.is_directory
    }
}
