/*!
 * Positioned Streams
 * StreamBase backends and the cursor built on top of them
 */

pub mod base;
pub mod codec_ops;
pub mod cursor;
pub mod fill;
pub mod local_disk;
pub mod memory;
pub mod scan_ops;
pub mod slice;

pub use base::StreamBase;
pub use cursor::Stream;
pub use fill::FillStreamBase;
pub use local_disk::LocalDiskBase;
pub use memory::MemoryStreamBase;
pub use slice::SliceStreamBase;
