//! Parallel timestamping pipeline
//!
//! The dispatcher enumerates the directory and fills the work queue; a
//! fixed pool of workers drains it, shelling out to the image tool once
//! per file.
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │     StampCoordinator     │
//!                  │  - scan directory        │
//!                  │  - enqueue file tasks    │
//!                  │  - join on acknowledges  │
//!                  └────────────┬─────────────┘
//!                               │
//!                  ┌────────────▼─────────────┐
//!                  │       Work Queue         │
//!                  │  (crossbeam channel)     │
//!                  │  enqueued/acked counters │
//!                  └────────────┬─────────────┘
//!            ┌──────────────────┼──────────────────┐
//!      ┌─────▼─────┐      ┌─────▼─────┐      ┌─────▼─────┐
//!      │  Worker 1 │      │  Worker 2 │      │  Worker N │
//!      │  convert  │      │  convert  │      │  convert  │
//!      └───────────┘      └───────────┘      └───────────┘
//! ```

pub mod coordinator;
pub mod queue;
pub mod scan;
pub mod worker;

pub use coordinator::{StampCoordinator, StampResult};
pub use queue::{FileTask, WorkQueue};
pub use scan::scan_directory;
pub use worker::Worker;
