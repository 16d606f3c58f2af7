/*!
 * Stream Scanning Operations
 * Alignment and delimiter scanning on the cursor
 */

use super::cursor::Stream;
use crate::core::limits::COPY_CHUNK_SIZE;
use crate::core::{VfsError, VfsResult};

#[inline]
fn align_gap(position: u64, alignment: u64) -> VfsResult<u64> {
    if alignment == 0 {
        return Err(VfsError::InvalidArgument("alignment must be non-zero".into()));
    }
    let rem = position % alignment;
    Ok(if rem == 0 { 0 } else { alignment - rem })
}

#[inline]
fn chunk_len(gap: u64) -> usize {
    usize::try_from(gap).map_or(COPY_CHUNK_SIZE, |gap| gap.min(COPY_CHUNK_SIZE))
}

impl Stream {
    /// Read past the filler up to the smallest multiple of `alignment`
    /// that is `>= position`
    ///
    /// A gap running past the end of data fails with `EndOfData`.
    pub async fn skip_to_align(&mut self, alignment: u64) -> VfsResult<&mut Self> {
        let mut gap = align_gap(self.position(), alignment)?;
        self.offset(gap)?;
        let mut chunk = vec![0u8; chunk_len(gap)];
        while gap > 0 {
            let n = chunk_len(gap);
            self.read_exact(&mut chunk[..n]).await?;
            gap -= n as u64;
        }
        Ok(self)
    }

    /// Write `fill` bytes up to the next multiple of `alignment`
    pub async fn write_to_align(&mut self, alignment: u64, fill: u8) -> VfsResult<()> {
        let mut gap = align_gap(self.position(), alignment)?;
        self.offset(gap)?;
        let chunk = vec![fill; chunk_len(gap)];
        while gap > 0 {
            let n = chunk_len(gap);
            self.write(&chunk[..n]).await?;
            gap -= n as u64;
        }
        Ok(())
    }

    /// Bytes up to (excluding) `delimiter`
    ///
    /// The delimiter is consumed. Scanning stops early, without error, after
    /// `limit` bytes or at end of data.
    pub async fn read_until(&mut self, delimiter: u8, limit: usize) -> VfsResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut byte = [0u8; 1];
        while out.len() < limit {
            if self.read(&mut byte).await? == 0 || byte[0] == delimiter {
                break;
            }
            out.push(byte[0]);
        }
        Ok(out)
    }

    /// One `\n` terminated line with a trailing `\r` removed
    pub async fn read_line(&mut self, limit: usize) -> VfsResult<String> {
        let mut line = self.read_until(b'\n', limit).await?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        String::from_utf8(line)
            .map_err(|e| VfsError::InvalidArgument(format!("invalid UTF-8 line: {}", e)))
    }
}
