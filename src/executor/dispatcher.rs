/*!
 * Worker Dispatcher
 *
 * Runs blocking-only native calls (stat, list, mkdir, delete, rename,
 * positional file I/O, process spawn) on a bounded worker pool so the
 * single execution context is never stalled.
 *
 * ## Guarantees
 *
 * - At most `max_workers` jobs run at once; extra submissions wait for a permit
 * - The awaiting task resumes on its own scheduler once the job finishes
 * - Native failures propagate as the job's `Err`
 * - Cancelling the waiter detaches: the job runs to completion and its
 *   result is discarded, the permit is released only when it finishes
 */

use super::completion::CompletionHandler;
use crate::core::{IoConfig, VfsError, VfsResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Bounded pool for blocking jobs
#[derive(Debug, Clone)]
pub struct Dispatcher {
    permits: Arc<Semaphore>,
    max_workers: usize,
    stats: Arc<DispatcherStats>,
}

/// Job counters
#[derive(Debug, Default)]
pub struct DispatcherStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl DispatcherStats {
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

impl Dispatcher {
    /// Create a dispatcher running at most `max_workers` jobs concurrently
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        info!(max_workers, "Worker dispatcher initialized");
        Self {
            permits: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            stats: Arc::new(DispatcherStats::default()),
        }
    }

    pub fn from_config(config: &IoConfig) -> VfsResult<Self> {
        config.validate()?;
        Ok(Self::new(config.worker_threads))
    }

    /// Process-wide dispatcher, sized from the environment on first use
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(|| {
            let config = IoConfig::from_env();
            Self::from_config(&config).unwrap_or_else(|e| {
                error!(error = %e, "Invalid dispatcher configuration, using defaults");
                Self::new(IoConfig::default().worker_threads)
            })
        })
    }

    #[inline]
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Jobs that could start right now without waiting
    #[inline]
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    #[inline]
    pub fn stats(&self) -> &DispatcherStats {
        &self.stats
    }

    /// Run `job` on a worker and suspend until its result is ready
    pub async fn execute<T, F>(&self, job: F) -> VfsResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> VfsResult<T> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| VfsError::IoFault("worker dispatcher closed".into()))?;

        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        let stats = self.stats.clone();
        let handle = tokio::task::spawn_blocking(move || {
            // Held until the job finishes, even if the waiter is gone
            let _permit = permit;
            let result = job();
            match &result {
                Ok(_) => stats.completed.fetch_add(1, Ordering::Relaxed),
                Err(_) => stats.failed.fetch_add(1, Ordering::Relaxed),
            };
            result
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Worker job panicked");
                Err(VfsError::IoFault(format!("worker job failed: {}", e)))
            }
        }
    }

    /// Callback-style submission: run `job` and deliver its result to `handler`
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<T, F>(&self, job: F, handler: CompletionHandler<T>)
    where
        T: Send + 'static,
        F: FnOnce() -> VfsResult<T> + Send + 'static,
    {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let result = dispatcher.execute(job).await;
            if handler.is_cancelled() {
                debug!("Dropping result of cancelled submission");
            }
            handler.complete(result);
        });
    }
}
