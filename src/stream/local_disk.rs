/*!
 * Local Disk Stream Backend
 * OS file handle driven through positional I/O on the worker dispatcher
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use super::base::StreamBase;
use crate::core::{VfsError, VfsResult};
use crate::executor::{await_completion, Dispatcher};

/// Positional file backend
///
/// Each operation is submitted to the dispatcher and awaited through the
/// completion bridge. In-flight jobs hold their own handle reference, so a
/// cancelled waiter never leaks or invalidates the descriptor; it is closed
/// once both `close` has been called and the last job has finished.
#[derive(Debug)]
pub struct LocalDiskBase {
    file: Mutex<Option<Arc<File>>>,
    path: PathBuf,
    dispatcher: Dispatcher,
}

impl LocalDiskBase {
    pub fn new(file: File, path: impl Into<PathBuf>, dispatcher: Dispatcher) -> Self {
        Self {
            file: Mutex::new(Some(Arc::new(file))),
            path: path.into(),
            dispatcher,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }

    fn handle(&self) -> VfsResult<Arc<File>> {
        self.file.lock().clone().ok_or_else(|| {
            VfsError::IoFault(format!("stream closed: {}", self.path.display()))
        })
    }

    /// Run a native file operation on a worker and await its completion
    async fn run<T, F>(&self, op: &'static str, job: F) -> VfsResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&File) -> io::Result<T> + Send + 'static,
    {
        let file = self.handle()?;
        let path = self.path.clone();
        let dispatcher = self.dispatcher.clone();
        await_completion(move |handler| {
            dispatcher.submit(
                move || job(&file).map_err(|e| VfsError::io(e, format!("{} {}", op, path.display()))),
                handler,
            )
        })
        .await
    }
}

#[async_trait]
impl StreamBase for LocalDiskBase {
    async fn read(&self, position: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let len = buf.len();
        if len == 0 {
            return Ok(0);
        }
        let chunk = self
            .run("read", move |file| {
                let mut chunk = vec![0u8; len];
                let n = read_at(file, &mut chunk, position)?;
                chunk.truncate(n);
                Ok(chunk)
            })
            .await?;
        trace!(path = %self.path.display(), position, len = chunk.len(), "disk read");
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }

    async fn write(&self, position: u64, buf: &[u8]) -> VfsResult<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let data = buf.to_vec();
        trace!(path = %self.path.display(), position, len = data.len(), "disk write");
        self.run("write", move |file| write_all_at(file, &data, position))
            .await
    }

    async fn length(&self) -> VfsResult<u64> {
        self.run("length", |file| file.metadata().map(|md| md.len()))
            .await
    }

    async fn set_length(&self, length: u64) -> VfsResult<()> {
        debug!(path = %self.path.display(), length, "disk set_length");
        self.run("set_length", move |file| file.set_len(length)).await
    }

    async fn close(&self) -> VfsResult<()> {
        if self.file.lock().take().is_some() {
            debug!(path = %self.path.display(), "disk stream closed");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], position: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    loop {
        match file.read_at(buf, position) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], position: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, position)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], position: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    loop {
        match file.seek_read(buf, position) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut position: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, position) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                buf = &buf[n..];
                position += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
