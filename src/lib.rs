/*!
 * VFS I/O Library
 *
 * Virtual filesystem and positioned-stream I/O:
 * - Codec: endian-aware fixed-width values, varints, strings
 * - Stream: cursor over memory, fill, slice and local disk backends
 * - Vfs: filesystem capability with local, jailed and temp roots
 * - Executor: completion bridge and bounded worker dispatcher
 */

pub mod codec;
pub mod core;
pub mod executor;
pub mod monitoring;
pub mod stream;
pub mod vfs;

// Re-exports
pub use crate::core::{IoConfig, VfsError, VfsResult};
pub use codec::Endian;
pub use executor::{await_completion, event_loop, CompletionHandler, Dispatcher};
pub use monitoring::init_tracing;
pub use stream::{
    FillStreamBase, LocalDiskBase, MemoryStreamBase, SliceStreamBase, Stream, StreamBase,
};
pub use vfs::{
    jailed_local_vfs, local_vfs, temp_vfs, JailedVfs, LocalVfs, ProcessHandler, ProcessOutput,
    Vfs, VfsFile, VfsOpenMode, VfsStat,
};
