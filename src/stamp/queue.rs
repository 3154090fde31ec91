//! Work queue with acknowledgment tracking
//!
//! This module provides the shared queue of files awaiting a timestamp.
//! The queue is populated entirely by the dispatcher before workers drain
//! it, and tracks enqueued vs acknowledged counts so the dispatcher can
//! block until every item has been fully processed (the join).
//!
//! Delivery is exactly-once: each item is received by a single worker
//! (crossbeam channel semantics), and acknowledged exactly once after the
//! external command for it finishes, whether it succeeded or not.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A single file awaiting a timestamp overlay
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Absolute path to the file
    pub path: PathBuf,
}

impl FileTask {
    /// Create a new file task
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued by workers
    pub dequeued: AtomicU64,

    /// Total tasks acknowledged as processed (success or failure)
    pub acknowledged: AtomicU64,
}

impl QueueStats {
    /// Items enqueued but not yet acknowledged
    pub fn outstanding(&self) -> u64 {
        self.enqueued.load(Ordering::SeqCst) - self.acknowledged.load(Ordering::SeqCst)
    }
}

/// Shared queue of file tasks with join semantics
#[derive(Debug)]
pub struct WorkQueue {
    /// Sender for adding tasks
    sender: Sender<FileTask>,

    /// Receiver for getting tasks
    receiver: Receiver<FileTask>,

    /// Queue statistics
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a new work queue
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender for this queue (used by the dispatcher)
    pub fn sender(&self) -> WorkQueueSender {
        WorkQueueSender {
            sender: self.sender.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> WorkQueueReceiver {
        WorkQueueReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Check if the queue is empty (not the same as drained - items may
    /// still be in flight)
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Total items enqueued so far
    pub fn enqueued(&self) -> u64 {
        self.stats.enqueued.load(Ordering::SeqCst)
    }

    /// Check if every enqueued item has been acknowledged
    ///
    /// The queue only counts down: the dispatcher enqueues everything up
    /// front, so once this returns true the join is complete.
    pub fn is_drained(&self) -> bool {
        self.stats.outstanding() == 0
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for sending tasks to the queue
#[derive(Clone)]
pub struct WorkQueueSender {
    sender: Sender<FileTask>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Send a task to the queue
    pub fn send(&self, task: FileTask) -> Result<(), ()> {
        self.sender.send(task).map_err(|_| ())?;
        self.stats.enqueued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for receiving and acknowledging tasks
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<FileTask>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Receive a task, waiting up to `timeout`
    ///
    /// The timeout keeps workers responsive to the shutdown flag while
    /// the queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FileTask> {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::SeqCst);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Try to receive a task without blocking
    pub fn try_recv(&self) -> Option<FileTask> {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::SeqCst);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Acknowledge a previously received task as fully processed
    pub fn ack(&self) {
        self.stats.acknowledged.fetch_add(1, Ordering::SeqCst);
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_basic() {
        let queue = WorkQueue::new();
        let sender = queue.sender();

        sender.send(FileTask::new("/photos/a.jpg".into())).unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.enqueued(), 1);

        let receiver = queue.receiver();
        let task = receiver.recv_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(task.path, PathBuf::from("/photos/a.jpg"));
    }

    #[test]
    fn test_queue_join_semantics() {
        let queue = WorkQueue::new();
        let sender = queue.sender();
        let receiver = queue.receiver();

        // Nothing enqueued: trivially drained
        assert!(queue.is_drained());

        sender.send(FileTask::new("/a.jpg".into())).unwrap();
        sender.send(FileTask::new("/b.jpg".into())).unwrap();
        assert!(!queue.is_drained());

        // Dequeuing alone does not drain - items are in flight
        receiver.try_recv().unwrap();
        receiver.try_recv().unwrap();
        assert!(queue.is_empty());
        assert!(!queue.is_drained());
        assert_eq!(queue.stats().outstanding(), 2);

        receiver.ack();
        assert!(!queue.is_drained());

        receiver.ack();
        assert!(queue.is_drained());
    }

    #[test]
    fn test_exactly_once_delivery() {
        let queue = WorkQueue::new();
        let sender = queue.sender();

        for i in 0..100 {
            sender.send(FileTask::new(format!("/photos/{i}.jpg").into())).unwrap();
        }

        // Two competing receivers drain the queue; each item is delivered once
        let r1 = queue.receiver();
        let r2 = queue.receiver();
        let mut seen = Vec::new();
        loop {
            match r1.try_recv().or_else(|| r2.try_recv()) {
                Some(task) => seen.push(task.path),
                None => break,
            }
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 100);
        assert_eq!(queue.stats().dequeued.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_recv_timeout_on_empty() {
        let queue = WorkQueue::new();
        let receiver = queue.receiver();
        assert!(receiver.recv_timeout(Duration::from_millis(5)).is_none());
    }
}
