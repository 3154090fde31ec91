//! Worker thread logic for parallel timestamping
//!
//! Each worker:
//! - Pulls file tasks from the shared work queue
//! - Invokes the external image command synchronously on the file
//! - Logs a per-file error on non-zero exit without aborting
//! - Acknowledges the task after the command finishes, success or not
//!
//! Workers poll the shutdown flag on every loop iteration; an in-flight
//! command invocation is never interrupted.

use crate::convert::Annotator;
use crate::error::{StampOutcome, WorkerError};
use crate::stamp::queue::WorkQueueReceiver;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// How long a worker waits for a task before re-checking the shutdown flag
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Files stamped successfully
    pub processed: AtomicU64,

    /// Files where the external command failed
    pub failed: AtomicU64,
}

impl WorkerStats {
    fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker thread that processes file tasks
#[derive(Debug)]
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        annotator: Arc<Annotator>,
        queue_rx: WorkQueueReceiver,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("stamper-{}", id))
            .spawn(move || worker_loop(id, annotator, queue_rx, shutdown, stats_clone))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Get a shared handle to the worker statistics
    ///
    /// The handle stays valid after `join` consumes the worker, so final
    /// counts can be read once the thread has actually exited.
    pub fn stats_handle(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WorkerError::Panicked {
                id: self.id,
                message: "Worker thread panicked".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    annotator: Arc<Annotator>,
    queue_rx: WorkQueueReceiver,
    shutdown: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    // Process tasks until shutdown. The flag is only ever written by the
    // main coordination point; workers never install signal handlers.
    while !shutdown.load(Ordering::Relaxed) {
        let task = match queue_rx.recv_timeout(RECV_TIMEOUT) {
            Some(task) => task,
            None => continue, // Timeout - check shutdown and retry
        };

        debug!(
            worker = id,
            command = %annotator.command_line(&task.path),
            "Processing file"
        );

        let outcome = annotator.stamp(&task.path);

        match &outcome {
            StampOutcome::Success { path } => {
                stats.record_processed();
                debug!(worker = id, file = %path.display(), "File stamped");
            }
            StampOutcome::Failed { path, reason } => {
                stats.record_failed();
                error!(
                    worker = id,
                    file = %path.display(),
                    reason = %reason,
                    "Error processing file"
                );
            }
        }

        // Acknowledge after the command finished, success or failure,
        // so the dispatcher's join observes progress.
        queue_rx.ack();
    }

    info!(
        worker = id,
        processed = stats.processed.load(Ordering::Relaxed),
        failed = stats.failed.load(Ordering::Relaxed),
        "Worker shutting down"
    );
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> (u64, u64) {
    let mut processed = 0u64;
    let mut failed = 0u64;

    for s in stats {
        processed += s.processed.load(Ordering::Relaxed);
        failed += s.failed.load(Ordering::Relaxed);
    }

    (processed, failed)
}
