/*!
 * Slice Stream Backend
 * Bounded window `[start, end)` over another base
 */

use async_trait::async_trait;
use std::sync::Arc;

use super::base::StreamBase;
use crate::core::{VfsError, VfsResult};

/// Window view over another base
///
/// Every access is translated into base coordinates and clamped into the
/// window. Requests reaching past the window are silently truncated and
/// fully out-of-window requests move 0 bytes: callers may probe beyond the
/// slice on purpose, so this is never an error.
///
/// Slices are always flat: a slice of a slice is built directly against the
/// non-slice base (see `Stream::slice_with_bounds`).
#[derive(Debug, Clone)]
pub struct SliceStreamBase {
    base: Arc<dyn StreamBase>,
    start: u64,
    end: u64,
}

impl SliceStreamBase {
    /// Create a window; an inverted range collapses to empty at `start`
    pub fn new(base: Arc<dyn StreamBase>, start: u64, end: u64) -> Self {
        Self {
            base,
            start,
            end: end.max(start),
        }
    }

    /// The underlying (non-slice) base
    #[inline]
    pub fn inner(&self) -> &Arc<dyn StreamBase> {
        &self.base
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn window_len(&self) -> u64 {
        self.end - self.start
    }

    /// Translate a slice-local request into a clamped base request
    #[inline]
    fn clamp(&self, position: u64, len: usize) -> (u64, usize) {
        let target_start = self.start.saturating_add(position).min(self.end);
        let target_end = target_start.saturating_add(len as u64).min(self.end);
        (target_start, (target_end - target_start) as usize)
    }
}

#[async_trait]
impl StreamBase for SliceStreamBase {
    async fn read(&self, position: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let (target, len) = self.clamp(position, buf.len());
        if len == 0 {
            return Ok(0);
        }
        self.base.read(target, &mut buf[..len]).await
    }

    async fn write(&self, position: u64, buf: &[u8]) -> VfsResult<()> {
        let (target, len) = self.clamp(position, buf.len());
        if len == 0 {
            return Ok(());
        }
        self.base.write(target, &buf[..len]).await
    }

    async fn length(&self) -> VfsResult<u64> {
        Ok(self.window_len())
    }

    async fn set_length(&self, _length: u64) -> VfsResult<()> {
        Err(VfsError::not_supported("set_length", "slice"))
    }

    /// The window does not own its base
    async fn close(&self) -> VfsResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "slice"
    }

    fn as_slice(&self) -> Option<&SliceStreamBase> {
        Some(self)
    }
}
