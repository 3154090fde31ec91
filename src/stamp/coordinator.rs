//! Stamp coordinator - orchestrates the parallel timestamping run
//!
//! The coordinator is responsible for:
//! - Enumerating eligible files and populating the work queue (dispatch)
//! - Starting the worker pool
//! - Blocking until every queued file is acknowledged (the join)
//! - Reacting to the shutdown flag and stopping the workers
//! - Final statistics
//!
//! Shutdown is a three-stage affair: RUNNING while the join is pending,
//! STOPPING once the flag is set (workers finish their in-flight command
//! and exit), STOPPED when every worker thread has been joined. The flag
//! itself is only written by the signal handler installed in main;
//! workers and the coordinator only read it.

use crate::config::StampConfig;
use crate::convert::Annotator;
use crate::error::{Result, StamperError, WorkerError};
use crate::stamp::queue::{FileTask, WorkQueue};
use crate::stamp::scan::scan_directory;
use crate::stamp::worker::{aggregate_stats, Worker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How often the join loop re-checks the queue and the shutdown flag
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a completed (or interrupted) run
#[derive(Debug)]
pub struct StampResult {
    /// Files queued at dispatch
    pub total_queued: u64,

    /// Files stamped successfully
    pub processed: u64,

    /// Files where the external command failed
    pub failed: u64,

    /// Time taken for the run
    pub duration: Duration,

    /// Whether the run completed (vs was interrupted)
    pub completed: bool,
}

/// Coordinates the parallel timestamping run
#[derive(Debug)]
pub struct StampCoordinator {
    /// Configuration
    config: Arc<StampConfig>,

    /// External command invoker shared by all workers
    annotator: Arc<Annotator>,

    /// Work queue of file tasks
    queue: WorkQueue,

    /// Worker threads
    workers: Vec<Worker>,

    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl StampCoordinator {
    /// Create a coordinator and dispatch all eligible files into the queue
    ///
    /// Enumeration and enqueuing happen here, before any worker exists,
    /// so `queued_files` is exact by the time the caller prints the run
    /// header. Directory listing failures are fatal.
    pub fn new(config: StampConfig) -> Result<Self> {
        let config = Arc::new(config);

        let annotator = Arc::new(Annotator::new(
            config.tool.clone(),
            config.convert_params.clone(),
        ));

        let queue = WorkQueue::new();

        let files = scan_directory(&config.directory)?;
        info!(
            dir = %config.directory.display(),
            files = files.len(),
            "Queued eligible files"
        );

        let sender = queue.sender();
        for path in files {
            sender
                .send(FileTask::new(path))
                .map_err(|_| StamperError::Worker(WorkerError::QueueSendFailed))?;
        }

        Ok(Self {
            config,
            annotator,
            queue,
            workers: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get a clone of the shutdown flag (for signal handlers)
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of files queued at dispatch
    pub fn queued_files(&self) -> u64 {
        self.queue.enqueued()
    }

    /// Run the timestamping: spawn workers, join on the queue, stop
    pub fn run(mut self) -> Result<StampResult> {
        let start = Instant::now();
        let total_queued = self.queue.enqueued();

        info!(
            dir = %self.config.directory.display(),
            workers = self.config.worker_count,
            tool = self.annotator.tool(),
            "Starting timestamping run"
        );

        self.spawn_workers()?;

        // Block until every item is acknowledged or shutdown is requested
        let completed = self.wait_for_join();

        // Stop the workers; each finishes its in-flight command first
        self.shutdown.store(true, Ordering::SeqCst);
        let (processed, failed) = self.join_workers();

        let duration = start.elapsed();

        info!(
            queued = total_queued,
            processed = processed,
            failed = failed,
            duration_secs = duration.as_secs(),
            completed = completed,
            "Run finished"
        );

        Ok(StampResult {
            total_queued,
            processed,
            failed,
            duration,
            completed,
        })
    }

    /// Spawn worker threads
    fn spawn_workers(&mut self) -> Result<()> {
        for id in 0..self.config.worker_count {
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.annotator),
                self.queue.receiver(),
                Arc::clone(&self.shutdown),
            )?;

            self.workers.push(worker);
        }

        info!(count = self.workers.len(), "Workers spawned");
        Ok(())
    }

    /// Wait until every queued item is acknowledged, or shutdown is requested
    ///
    /// Returns true if the queue drained fully, false on interrupt.
    fn wait_for_join(&self) -> bool {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("Shutdown requested, abandoning remaining queue");
                return false;
            }

            if self.queue.is_drained() {
                return true;
            }

            thread::sleep(JOIN_POLL_INTERVAL);
        }
    }

    /// Join all worker threads and collect final stats
    ///
    /// Workers record an in-flight item only after its external command
    /// finishes, so the counts are aggregated after every thread has
    /// exited - not before. On an interrupted run the last items land in
    /// the stats between the shutdown store and the join.
    fn join_workers(&mut self) -> (u64, u64) {
        let workers = std::mem::take(&mut self.workers);
        let mut stats = Vec::with_capacity(workers.len());

        for worker in workers {
            stats.push(worker.stats_handle());
            if let Err(e) = worker.join() {
                warn!(error = %e, "Worker failed to join cleanly");
            }
        }

        aggregate_stats(&stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StampConfig;
    use std::path::Path;

    fn touch(path: &Path) {
        std::fs::File::create(path).unwrap();
    }

    fn test_config(dir: &Path, tool: &str, workers: usize) -> StampConfig {
        StampConfig {
            directory: dir.to_path_buf(),
            worker_count: workers,
            tool: tool.to_string(),
            convert_params: vec![],
            show_progress: false,
        }
    }

    #[test]
    fn test_run_processes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..6 {
            touch(&dir.path().join(format!("{i}.jpg")));
        }
        touch(&dir.path().join("skip.txt"));

        let coordinator =
            StampCoordinator::new(test_config(dir.path(), "true", 3)).unwrap();
        assert_eq!(coordinator.queued_files(), 6);

        let result = coordinator.run().unwrap();
        assert!(result.completed);
        assert_eq!(result.total_queued, 6);
        assert_eq!(result.processed, 6);
        assert_eq!(result.failed, 0);
    }

    #[test]
    fn test_run_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("notes.txt"));

        let coordinator =
            StampCoordinator::new(test_config(dir.path(), "true", 2)).unwrap();
        assert_eq!(coordinator.queued_files(), 0);

        let result = coordinator.run().unwrap();
        assert!(result.completed);
        assert_eq!(result.processed, 0);
    }

    #[test]
    fn test_run_tolerates_failing_tool() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            touch(&dir.path().join(format!("{i}.jpg")));
        }

        let coordinator =
            StampCoordinator::new(test_config(dir.path(), "false", 2)).unwrap();
        let result = coordinator.run().unwrap();

        // The run still completes; every file was acknowledged
        assert!(result.completed);
        assert_eq!(result.failed, 4);
        assert_eq!(result.processed, 0);
    }

    #[test]
    fn test_interrupt_before_start() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            touch(&dir.path().join(format!("{i}.jpg")));
        }

        let coordinator =
            StampCoordinator::new(test_config(dir.path(), "true", 2)).unwrap();

        // Interrupt raised before the workers pick anything up
        coordinator.shutdown_flag().store(true, Ordering::SeqCst);

        let result = coordinator.run().unwrap();
        assert!(!result.completed);
        assert!(result.processed + result.failed <= 10);
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let err =
            StampCoordinator::new(test_config(Path::new("/no/such/dir"), "true", 2)).unwrap_err();
        assert!(matches!(err, StamperError::ReadDir { .. }));
    }
}
