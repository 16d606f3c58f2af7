/*!
 * Process Output Handling
 * Receivers for stdout/stderr chunks streamed by `Vfs::exec`
 */

use bytes::{Bytes, BytesMut};

/// Receives output chunks as the process produces them
///
/// Chunks arrive in order per stream; stdout and stderr are interleaved in
/// the order they were read.
pub trait ProcessHandler: Send {
    fn on_out(&mut self, chunk: Bytes);

    fn on_err(&mut self, chunk: Bytes);
}

/// Handler accumulating both streams in memory
#[derive(Debug, Default, Clone)]
pub struct ProcessOutput {
    stdout: BytesMut,
    stderr: BytesMut,
}

impl ProcessOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Lossy UTF-8 view of stdout
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl ProcessHandler for ProcessOutput {
    fn on_out(&mut self, chunk: Bytes) {
        self.stdout.extend_from_slice(&chunk);
    }

    fn on_err(&mut self, chunk: Bytes) {
        self.stderr.extend_from_slice(&chunk);
    }
}
