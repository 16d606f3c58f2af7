/*!
 * Memory Stream Backend
 * Growable in-memory byte buffer
 */

use async_trait::async_trait;
use parking_lot::RwLock;

use super::base::StreamBase;
use crate::core::limits::MEMORY_INITIAL_CAPACITY;
use crate::core::{VfsError, VfsResult};

/// Growable byte buffer backend
///
/// Reads outside `[0, len)` return 0 bytes. Writes past the end grow the
/// buffer, zero-filling any gap; capacity grows by amortized doubling and
/// is tracked separately from length.
#[derive(Debug, Default)]
pub struct MemoryStreamBase {
    data: RwLock<Vec<u8>>,
}

impl MemoryStreamBase {
    pub fn new() -> Self {
        Self::with_capacity(MEMORY_INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.read().capacity()
    }

    fn index(position: u64) -> VfsResult<usize> {
        usize::try_from(position).map_err(|_| {
            VfsError::InvalidArgument(format!("position {} exceeds addressable memory", position))
        })
    }
}

#[async_trait]
impl StreamBase for MemoryStreamBase {
    async fn read(&self, position: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let data = self.data.read();
        let start = match usize::try_from(position) {
            Ok(start) if start < data.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    async fn write(&self, position: u64, buf: &[u8]) -> VfsResult<()> {
        let start = Self::index(position)?;
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| VfsError::InvalidArgument("write end overflows".into()))?;

        let mut data = self.data.write();
        if end > data.len() {
            // reserve() grows geometrically
            let additional = end - data.len();
            data.reserve(additional);
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        Ok(())
    }

    async fn length(&self) -> VfsResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    async fn set_length(&self, length: u64) -> VfsResult<()> {
        let length = Self::index(length)?;
        self.data.write().resize(length, 0);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
