/*!
 * Async Execution Layer
 *
 * Reconciles the two native asynchrony styles behind one suspension contract:
 * - Completion: single-shot native callbacks become one await point
 * - Dispatcher: blocking-only syscalls run on a bounded worker pool
 *
 * Application tasks run cooperatively on a single execution context built by
 * [`event_loop`]; they suspend only at these two boundaries.
 */

pub mod completion;
pub mod dispatcher;

pub use completion::{await_completion, CompletionHandler};
pub use dispatcher::{Dispatcher, DispatcherStats};

use crate::core::{IoConfig, VfsError, VfsResult};
use tokio::runtime::{Builder, Runtime};
use tracing::info;

/// Build the single-threaded execution context
///
/// The blocking pool backing the dispatcher is capped at the configured
/// worker count.
pub fn event_loop(config: &IoConfig) -> VfsResult<Runtime> {
    config.validate()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .max_blocking_threads(config.worker_threads)
        .thread_name("vfs-io-worker")
        .build()
        .map_err(|e| VfsError::io(e, "build event loop"))?;
    info!(workers = config.worker_threads, "Event loop ready");
    Ok(runtime)
}
