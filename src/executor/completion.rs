/*!
 * Completion Bridge
 *
 * Converts a single-shot native completion callback into one
 * suspension/resumption pair for the awaiting task.
 */

use crate::core::{VfsError, VfsResult};
use tokio::sync::oneshot;
use tracing::trace;

/// Single-shot completion callback handed to a native operation
///
/// Consumed by [`CompletionHandler::complete`], so it can fire at most once.
/// Dropping it unfired resumes the waiter with an `IoFault`.
#[must_use = "a completion handler must be completed or the waiter fails"]
#[derive(Debug)]
pub struct CompletionHandler<T> {
    tx: oneshot::Sender<VfsResult<T>>,
}

impl<T> CompletionHandler<T> {
    /// Deliver the native result to the waiter
    ///
    /// A waiter that was cancelled simply discards the result.
    pub fn complete(self, result: VfsResult<T>) {
        if self.tx.send(result).is_err() {
            trace!("completion delivered after waiter was cancelled");
        }
    }

    #[inline]
    pub fn completed(self, value: T) {
        self.complete(Ok(value));
    }

    #[inline]
    pub fn failed(self, error: VfsError) {
        self.complete(Err(error));
    }

    /// Whether the awaiting task has gone away
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Register a completion callback and suspend until it fires
///
/// `register` receives the handler and must pass it to the native
/// operation. The returned future resumes exactly once: with the callback's
/// result, or with an `IoFault` if the handler is dropped unfired.
pub async fn await_completion<T, F>(register: F) -> VfsResult<T>
where
    F: FnOnce(CompletionHandler<T>),
{
    let (tx, rx) = oneshot::channel();
    register(CompletionHandler { tx });
    match rx.await {
        Ok(result) => result,
        Err(_) => Err(VfsError::IoFault(
            "completion handler dropped without a result".into(),
        )),
    }
}
