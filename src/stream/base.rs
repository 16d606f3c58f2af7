/*!
 * Stream Base Trait
 * Position-addressed read/write/length/close contract beneath a Stream cursor
 */

use async_trait::async_trait;
use std::fmt;

use super::slice::SliceStreamBase;
use crate::core::{VfsError, VfsResult};

/// Position-addressed byte source/sink
///
/// Not cursor-aware: every call names its absolute position. Every default
/// fails with `NotSupported`; backends override only what they support.
/// `close` must be idempotent.
///
/// No implicit synchronization is provided across cursors sharing a base.
#[async_trait]
pub trait StreamBase: Send + Sync + fmt::Debug {
    /// Read up to `buf.len()` bytes at `position`, returning the count moved
    async fn read(&self, position: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let _ = (position, buf);
        Err(VfsError::not_supported("read", self.name()))
    }

    /// Write all of `buf` at `position`, or fail
    async fn write(&self, position: u64, buf: &[u8]) -> VfsResult<()> {
        let _ = (position, buf);
        Err(VfsError::not_supported("write", self.name()))
    }

    async fn length(&self) -> VfsResult<u64> {
        Err(VfsError::not_supported("length", self.name()))
    }

    async fn set_length(&self, length: u64) -> VfsResult<()> {
        let _ = length;
        Err(VfsError::not_supported("set_length", self.name()))
    }

    async fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    /// Backend name for diagnostics
    fn name(&self) -> &str {
        "stream"
    }

    /// Downcast used to flatten slice-of-slice chains
    fn as_slice(&self) -> Option<&SliceStreamBase> {
        None
    }
}
