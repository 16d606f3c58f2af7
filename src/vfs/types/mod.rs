/*!
 * VFS Types
 * Open modes and stat snapshots shared by every backend
 */

mod open_mode;
mod stat;

pub use open_mode::VfsOpenMode;
pub use stat::VfsStat;
