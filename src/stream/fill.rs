/*!
 * Fill Stream Backend
 * Constant-byte source of fixed length
 */

use async_trait::async_trait;

use super::base::StreamBase;
use crate::core::VfsResult;

/// Constant-byte source
///
/// Reads always succeed, returning `min(len, length - position)` copies of
/// the fill byte and 0 at or past the end. Writes are accepted and dropped.
/// The clamping is part of the contract, not an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStreamBase {
    fill: u8,
    length: u64,
}

impl FillStreamBase {
    pub const fn new(fill: u8, length: u64) -> Self {
        Self { fill, length }
    }

    /// Endless source (length `u64::MAX`)
    pub const fn unbounded(fill: u8) -> Self {
        Self::new(fill, u64::MAX)
    }

    #[inline]
    pub const fn fill_byte(&self) -> u8 {
        self.fill
    }
}

#[async_trait]
impl StreamBase for FillStreamBase {
    async fn read(&self, position: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let remaining = self.length.saturating_sub(position);
        let n = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        buf[..n].fill(self.fill);
        Ok(n)
    }

    async fn write(&self, _position: u64, _buf: &[u8]) -> VfsResult<()> {
        Ok(())
    }

    async fn length(&self) -> VfsResult<u64> {
        Ok(self.length)
    }

    fn name(&self) -> &str {
        "fill"
    }
}
