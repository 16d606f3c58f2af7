/*!
 * Stream Cursor
 * Mutable position over a shared StreamBase
 */

use std::fmt;
use std::sync::Arc;

use super::base::StreamBase;
use super::fill::FillStreamBase;
use super::memory::MemoryStreamBase;
use super::slice::SliceStreamBase;
use crate::core::limits::COPY_CHUNK_SIZE;
use crate::core::{VfsError, VfsResult};

/// Positioned cursor over a [`StreamBase`]
///
/// Cheap to create and clone; clones share the base but move independently.
/// Each successful transfer advances `position` by exactly the number of
/// bytes moved. Writes are all-or-nothing.
#[derive(Clone)]
pub struct Stream {
    base: Arc<dyn StreamBase>,
    position: u64,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("base", &self.base.name())
            .field("position", &self.position)
            .finish()
    }
}

impl Stream {
    pub fn new(base: Arc<dyn StreamBase>) -> Self {
        Self::at(base, 0)
    }

    pub fn at(base: Arc<dyn StreamBase>, position: u64) -> Self {
        Self { base, position }
    }

    pub fn from_base<B: StreamBase + 'static>(base: B) -> Self {
        Self::new(Arc::new(base))
    }

    /// Growable in-memory stream starting with `data`
    pub fn memory(data: impl Into<Vec<u8>>) -> Self {
        Self::from_base(MemoryStreamBase::from_vec(data.into()))
    }

    /// Constant `fill` byte source of `length` bytes
    pub fn fill(fill: u8, length: u64) -> Self {
        Self::from_base(FillStreamBase::new(fill, length))
    }

    #[inline]
    pub fn base(&self) -> &Arc<dyn StreamBase> {
        &self.base
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    /// Move relative to the current position
    pub fn skip(&mut self, delta: i64) -> VfsResult<&mut Self> {
        self.position = self.position.checked_add_signed(delta).ok_or_else(|| {
            VfsError::InvalidArgument(format!(
                "cannot move {} bytes from position {}",
                delta, self.position
            ))
        })?;
        Ok(self)
    }

    /// Position `count` bytes past the cursor, if representable
    pub(crate) fn offset(&self, count: u64) -> VfsResult<u64> {
        self.position.checked_add(count).ok_or_else(|| {
            VfsError::InvalidArgument(format!(
                "{} bytes past position {} overflows",
                count, self.position
            ))
        })
    }

    // ========================================================================
    // Positional Primitives
    // ========================================================================

    /// Read into `buf` at the cursor; returns the count moved (0 at end)
    pub async fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        let n = self.base.read(self.position, buf).await?;
        self.position = self.offset(n as u64)?;
        Ok(n)
    }

    /// Write all of `buf` at the cursor
    ///
    /// A write that would carry the cursor past `u64::MAX` is rejected
    /// before anything reaches the base.
    pub async fn write(&mut self, buf: &[u8]) -> VfsResult<()> {
        let end = self.offset(buf.len() as u64)?;
        self.base.write(self.position, buf).await?;
        self.position = end;
        Ok(())
    }

    pub async fn length(&self) -> VfsResult<u64> {
        self.base.length().await
    }

    pub async fn set_length(&self, length: u64) -> VfsResult<()> {
        self.base.set_length(length).await
    }

    /// Whether the base reports a length at all
    pub async fn has_length(&self) -> bool {
        self.base.length().await.is_ok()
    }

    /// `length - position`, saturating at 0
    pub async fn available(&self) -> VfsResult<u64> {
        Ok(self.length().await?.saturating_sub(self.position))
    }

    pub async fn eof(&self) -> VfsResult<bool> {
        Ok(self.available().await? == 0)
    }

    /// Cut the stream at the cursor
    pub async fn truncate(&self) -> VfsResult<()> {
        self.set_length(self.position).await
    }

    /// Close the base; safe to call repeatedly
    pub async fn close(&self) -> VfsResult<()> {
        self.base.close().await
    }

    // ========================================================================
    // Slices
    // ========================================================================

    /// Window `[start, end)` clamped into `[0, length]`
    ///
    /// Slicing a slice is flattened onto the underlying base.
    pub async fn slice_with_bounds(&self, start: u64, end: u64) -> VfsResult<Stream> {
        let len = self.length().await?;
        let start = start.min(len);
        let end = end.min(len);

        let slice = match self.base.as_slice() {
            Some(parent) => SliceStreamBase::new(
                parent.inner().clone(),
                parent.start() + start,
                parent.start() + end,
            ),
            None => SliceStreamBase::new(self.base.clone(), start, end),
        };
        Ok(Stream::from_base(slice))
    }

    pub async fn slice_with_size(&self, position: u64, length: u64) -> VfsResult<Stream> {
        self.slice_with_bounds(position, position.saturating_add(length))
            .await
    }

    /// Window from `start` to the end
    pub async fn slice_start(&self, start: u64) -> VfsResult<Stream> {
        self.slice_with_bounds(start, u64::MAX).await
    }

    /// Window from the cursor to the end
    pub async fn slice_here(&self) -> VfsResult<Stream> {
        self.slice_start(self.position).await
    }

    /// Window of `length` bytes at the cursor; the cursor moves past it
    pub async fn read_slice(&mut self, length: u64) -> VfsResult<Stream> {
        let slice = self.slice_with_size(self.position, length).await?;
        self.position = self.offset(slice.length().await?)?;
        Ok(slice)
    }

    // ========================================================================
    // Bulk Reads
    // ========================================================================

    /// Fill `buf` completely or fail with `EndOfData`
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> VfsResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(VfsError::end_of_data(buf.len(), filled));
            }
            filled += n;
        }
        Ok(())
    }

    /// Read until `buf` is full or the data ends; returns the count read
    pub async fn read_exact_to(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Single read of up to `len` bytes
    pub async fn read_bytes(&mut self, len: usize) -> VfsResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let n = self.read(&mut buf).await?;
        buf.truncate(n);
        Ok(buf)
    }

    pub async fn read_bytes_exact(&mut self, len: usize) -> VfsResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf).await?;
        Ok(buf)
    }

    /// Everything from the cursor until the base reports no more data
    pub async fn read_all(&mut self) -> VfsResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
        loop {
            let n = self.read(&mut chunk).await?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }

    /// Exactly the `available()` bytes
    pub async fn read_available(&mut self) -> VfsResult<Vec<u8>> {
        let available = usize::try_from(self.available().await?).map_err(|_| {
            VfsError::InvalidArgument("available bytes exceed addressable memory".into())
        })?;
        self.read_bytes_exact(available).await
    }

    /// Whole contents regardless of the cursor (which is left untouched)
    pub async fn to_vec(&self) -> VfsResult<Vec<u8>> {
        match self.length().await {
            Ok(len) => self.slice_with_bounds(0, len).await?.read_all().await,
            Err(VfsError::NotSupported(_)) => self.clone().read_all().await,
            Err(e) => Err(e),
        }
    }

    /// Copy from the cursor to `target` until a read returns 0
    pub async fn copy_to(&mut self, target: &mut Stream) -> VfsResult<u64> {
        let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = self.read(&mut chunk).await?;
            if n == 0 {
                return Ok(total);
            }
            target.write(&chunk[..n]).await?;
            total += n as u64;
        }
    }
}
