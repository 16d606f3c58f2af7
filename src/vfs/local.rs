/*!
 * Local Filesystem Backend
 * Host filesystem access through the worker dispatcher
 */

use async_trait::async_trait;
use bytes::Bytes;
use path_clean::PathClean;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn, Instrument};

use super::paths;
use super::process::ProcessHandler;
use super::traits::{Vfs, VfsListing};
use super::types::{VfsOpenMode, VfsStat};
use crate::core::limits::EXEC_CHUNK_BACKLOG;
use crate::core::{IoConfig, VfsError, VfsResult};
use crate::executor::Dispatcher;
use crate::monitoring::span_operation;
use crate::stream::{LocalDiskBase, Stream, StreamBase};

/// Local filesystem rooted at a host directory
///
/// Virtual `/` maps to `root`. Every native call runs on the dispatcher.
#[derive(Debug, Clone)]
pub struct LocalVfs {
    root: PathBuf,
    dispatcher: Dispatcher,
    exec_chunk_size: usize,
}

impl LocalVfs {
    /// Create new local filesystem rooted at specified path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let config = IoConfig::from_env();
        Self::with_dispatcher(root, Dispatcher::global().clone())
            .with_exec_chunk_size(config.exec_chunk_size)
    }

    pub fn with_dispatcher<P: Into<PathBuf>>(root: P, dispatcher: Dispatcher) -> Self {
        let root: PathBuf = root.into();
        Self {
            root: root.clean(),
            dispatcher,
            exec_chunk_size: IoConfig::default().exec_chunk_size,
        }
    }

    #[must_use]
    pub fn with_exec_chunk_size(mut self, size: usize) -> Self {
        self.exec_chunk_size = size.max(1);
        self
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a virtual path onto the host, clamped under `root`
    fn resolve(&self, path: &str) -> VfsResult<PathBuf> {
        let normalized = paths::normalize(path)?;
        let mut result = self.root.clone();
        for segment in normalized.split(paths::SEPARATOR).filter(|s| !s.is_empty()) {
            result.push(segment);
        }
        Ok(result)
    }

    /// Map an ordinary failure to `false`, anything else to `IoFault`
    fn outcome(result: io::Result<()>, context: String) -> VfsResult<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if is_ordinary(&e) => {
                debug!(error = %e, "{} failed", context);
                Ok(false)
            }
            Err(e) => Err(VfsError::io(e, context)),
        }
    }
}

fn is_ordinary(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::AlreadyExists
            | ErrorKind::DirectoryNotEmpty
            | ErrorKind::NotADirectory
            | ErrorKind::IsADirectory
    )
}

#[async_trait]
impl Vfs for LocalVfs {
    fn absolute_path(&self, path: &str) -> VfsResult<String> {
        Ok(self.resolve(path)?.display().to_string())
    }

    async fn open(&self, path: &str, mode: VfsOpenMode) -> VfsResult<Stream> {
        let full_path = self.resolve(path)?;
        let span = span_operation("open", path);
        let target = full_path.clone();
        let file = self
            .dispatcher
            .execute(move || {
                mode.to_open_options()
                    .open(&target)
                    .map_err(|e| VfsError::io(e, format!("open {}", target.display())))
            })
            .instrument(span)
            .await?;
        debug!(path = %full_path.display(), ?mode, "Opened local file");
        let base: Arc<dyn StreamBase> =
            Arc::new(LocalDiskBase::new(file, full_path, self.dispatcher.clone()));

        // Appending cursors start at the current end
        let position = match mode {
            VfsOpenMode::Append => base.length().await?,
            _ => 0,
        };
        Ok(Stream::at(base, position))
    }

    async fn stat(&self, path: &str) -> VfsResult<VfsStat> {
        let full_path = self.resolve(path)?;
        let virtual_path = paths::normalize(path)?;
        self.dispatcher
            .execute(move || match fs::metadata(&full_path) {
                Ok(md) => Ok(VfsStat::existing(virtual_path, md.is_dir(), md.len())),
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                    Ok(VfsStat::missing(virtual_path))
                }
                Err(e) => Err(VfsError::io(e, format!("stat {}", full_path.display()))),
            })
            .instrument(span_operation("stat", path))
            .await
    }

    async fn list(&self, path: &str) -> VfsResult<VfsListing> {
        let full_path = self.resolve(path)?;
        let dir = paths::normalize(path)?;
        let dispatcher = self.dispatcher.clone();

        let target = full_path.clone();
        let mut entries = dispatcher
            .execute(move || {
                fs::read_dir(&target)
                    .map_err(|e| VfsError::io(e, format!("list {}", target.display())))
            })
            .instrument(span_operation("list", path))
            .await?;

        Ok(Box::pin(async_stream::stream! {
            loop {
                // One directory entry per worker job
                let step = dispatcher
                    .execute(move || {
                        let next = entries.next();
                        Ok((entries, next))
                    })
                    .await;
                let next = match step {
                    Ok((rest, next)) => {
                        entries = rest;
                        next
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                match next {
                    None => break,
                    Some(Ok(entry)) => {
                        yield Ok(paths::child(&dir, &entry.file_name().to_string_lossy()));
                    }
                    Some(Err(e)) => {
                        yield Err(VfsError::io(e, format!("list {}", full_path.display())));
                        break;
                    }
                }
            }
        }))
    }

    async fn mkdir(&self, path: &str) -> VfsResult<bool> {
        let full_path = self.resolve(path)?;
        self.dispatcher
            .execute(move || {
                let context = format!("mkdir {}", full_path.display());
                Self::outcome(fs::create_dir(&full_path), context)
            })
            .instrument(span_operation("mkdir", path))
            .await
    }

    async fn delete(&self, path: &str) -> VfsResult<bool> {
        let full_path = self.resolve(path)?;
        self.dispatcher
            .execute(move || {
                let context = format!("delete {}", full_path.display());
                let result = match fs::symlink_metadata(&full_path) {
                    Ok(md) if md.is_dir() => fs::remove_dir(&full_path),
                    Ok(_) => fs::remove_file(&full_path),
                    Err(e) => Err(e),
                };
                Self::outcome(result, context)
            })
            .instrument(span_operation("delete", path))
            .await
    }

    async fn rename(&self, src: &str, dst: &str) -> VfsResult<bool> {
        let from = self.resolve(src)?;
        let to = self.resolve(dst)?;
        self.dispatcher
            .execute(move || {
                let context = format!("rename {} -> {}", from.display(), to.display());
                Self::outcome(fs::rename(&from, &to), context)
            })
            .instrument(span_operation("rename", src))
            .await
    }

    async fn set_size(&self, path: &str, size: u64) -> VfsResult<()> {
        let full_path = self.resolve(path)?;
        self.dispatcher
            .execute(move || {
                fs::OpenOptions::new()
                    .write(true)
                    .open(&full_path)
                    .and_then(|file| file.set_len(size))
                    .map_err(|e| VfsError::io(e, format!("set_size {}", full_path.display())))
            })
            .instrument(span_operation("set_size", path))
            .await
    }

    async fn exec(
        &self,
        path: &str,
        cmd_and_args: &[String],
        handler: &mut dyn ProcessHandler,
    ) -> VfsResult<i32> {
        let (program, args) = cmd_and_args
            .split_first()
            .ok_or_else(|| VfsError::InvalidArgument("exec requires a command".into()))?;
        let cwd = self.resolve(path)?;
        let span = span_operation("exec", path);

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let program_name = program.clone();
        let child = self
            .dispatcher
            .execute(move || {
                command
                    .spawn()
                    .map_err(|e| VfsError::io(e, format!("spawn {}", program_name)))
            })
            .instrument(span.clone())
            .await?;

        // The pump owns the child; dropping this future only stops delivery
        let (tx, mut rx) = mpsc::channel(EXEC_CHUNK_BACKLOG);
        let task = tokio::spawn(pump(child, self.exec_chunk_size, tx).instrument(span));

        while let Some(chunk) = rx.recv().await {
            match chunk {
                Chunk::Stdout(bytes) => handler.on_out(bytes),
                Chunk::Stderr(bytes) => handler.on_err(bytes),
            }
        }
        let status = task
            .await
            .map_err(|e| VfsError::IoFault(format!("exec {}: {}", program, e)))??;

        let code = exit_code(status);
        if code != 0 {
            warn!(program = %program, code, "Process exited with non-zero status");
        } else {
            debug!(program = %program, "Process exited");
        }
        Ok(code)
    }

    fn name(&self) -> &str {
        "local"
    }
}

enum Chunk {
    Stdout(Bytes),
    Stderr(Bytes),
}

/// Forward both pipes until the child exits, then drain what is left
///
/// Runs detached: once the receiver is gone the child still runs to
/// completion and its output is discarded.
async fn pump(
    mut child: Child,
    chunk_size: usize,
    chunks: mpsc::Sender<Chunk>,
) -> VfsResult<ExitStatus> {
    let (mut stdout, mut stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(out), Some(err)) => (out, err),
        _ => return Err(VfsError::IoFault("child pipes unavailable".into())),
    };

    let mut out_buf = vec![0u8; chunk_size];
    let mut err_buf = vec![0u8; chunk_size];
    let mut out_open = true;
    let mut err_open = true;

    let status = loop {
        // Whichever pipe is ready first is serviced; neither can starve
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read {
                Ok(0) => out_open = false,
                Ok(n) => forward(&chunks, Chunk::Stdout(Bytes::copy_from_slice(&out_buf[..n]))).await,
                Err(e) => return Err(VfsError::io(e, "read stdout")),
            },
            read = stderr.read(&mut err_buf), if err_open => match read {
                Ok(0) => err_open = false,
                Ok(n) => forward(&chunks, Chunk::Stderr(Bytes::copy_from_slice(&err_buf[..n]))).await,
                Err(e) => return Err(VfsError::io(e, "read stderr")),
            },
            status = child.wait() => {
                break status.map_err(|e| VfsError::io(e, "wait for child"))?;
            }
        }
    };

    // Final pass: everything still buffered in either pipe
    if let Some(rest) = drain(&mut stdout, out_open).await? {
        forward(&chunks, Chunk::Stdout(rest)).await;
    }
    if let Some(rest) = drain(&mut stderr, err_open).await? {
        forward(&chunks, Chunk::Stderr(rest)).await;
    }
    Ok(status)
}

async fn forward(chunks: &mpsc::Sender<Chunk>, chunk: Chunk) {
    // A closed channel means the caller stopped listening
    let _ = chunks.send(chunk).await;
}

async fn drain<R: AsyncRead + Unpin>(pipe: &mut R, open: bool) -> VfsResult<Option<Bytes>> {
    if !open {
        return Ok(None);
    }
    let mut rest = Vec::new();
    pipe.read_to_end(&mut rest)
        .await
        .map_err(|e| VfsError::io(e, "drain child output"))?;
    Ok((!rest.is_empty()).then(|| Bytes::from(rest)))
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
