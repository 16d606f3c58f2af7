/*!
 * Virtual File System Module
 * Capability trait, local backend, jail decorator and file handles
 */

pub mod file;
pub mod jail;
pub mod local;
pub mod paths;
pub mod process;
pub mod traits;
pub mod types;

// Re-exports
pub use file::{jailed_local_vfs, local_vfs, temp_vfs, VfsFile};
pub use jail::JailedVfs;
pub use local::LocalVfs;
pub use process::{ProcessHandler, ProcessOutput};
pub use traits::{Vfs, VfsListing};
pub use types::{VfsOpenMode, VfsStat};
