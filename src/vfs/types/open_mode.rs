/*!
 * VFS Open Mode
 * How `Vfs::open` acquires a file handle
 */

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;

/// File open mode
///
/// Every mode can read. All modes except `Read` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VfsOpenMode {
    /// Existing file, no writes
    #[default]
    Read,
    /// Existing file, no truncate, no create
    Write,
    /// Existing file, writes go to the end
    Append,
    /// Create if absent, keep contents otherwise
    Create,
    /// Fail if the target exists
    CreateNew,
    /// Create or truncate to empty
    CreateOrTruncate,
}

impl VfsOpenMode {
    pub const ALL: [VfsOpenMode; 6] = [
        VfsOpenMode::Read,
        VfsOpenMode::Write,
        VfsOpenMode::Append,
        VfsOpenMode::Create,
        VfsOpenMode::CreateNew,
        VfsOpenMode::CreateOrTruncate,
    ];

    /// Check if any write operation is possible
    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, VfsOpenMode::Read)
    }

    /// Check if this may create a file
    #[inline]
    #[must_use]
    pub const fn will_create(&self) -> bool {
        matches!(
            self,
            VfsOpenMode::Create | VfsOpenMode::CreateNew | VfsOpenMode::CreateOrTruncate
        )
    }

    #[inline]
    #[must_use]
    pub const fn will_truncate(&self) -> bool {
        matches!(self, VfsOpenMode::CreateOrTruncate)
    }

    /// Native open options for this mode
    #[must_use]
    pub fn to_open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(true);
        match self {
            VfsOpenMode::Read => {}
            VfsOpenMode::Write => {
                options.write(true);
            }
            VfsOpenMode::Append => {
                options.write(true).append(true);
            }
            VfsOpenMode::Create => {
                options.write(true).create(true);
            }
            VfsOpenMode::CreateNew => {
                options.write(true).create_new(true);
            }
            VfsOpenMode::CreateOrTruncate => {
                options.write(true).create(true).truncate(true);
            }
        }
        options
    }
}
