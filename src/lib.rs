//! timestamper - Parallel JPEG Timestamp Overlay
//!
//! Overlays each JPEG's embedded capture time (EXIF DateTimeOriginal) onto
//! the image itself by shelling out to ImageMagick's `convert`, once per
//! file, across a pool of worker threads. Files are modified in place.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Dispatcher                          │
//! │  - list directory (non-recursive, .jpg/.jpeg filter)     │
//! │  - enqueue every eligible file                           │
//! │  - block until all items acknowledged (join)             │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Work Queue                          │
//! │          (crossbeam channel + ack counters)              │
//! └───────────────────────────┬─────────────────────────────┘
//!       ┌─────────────────────┼─────────────────────┐
//! ┌─────▼─────┐         ┌─────▼─────┐         ┌─────▼─────┐
//! │ Worker 1  │         │ Worker 2  │   ...   │ Worker N  │
//! │  convert  │         │  convert  │         │  convert  │
//! └───────────┘         └───────────┘         └───────────┘
//! ```
//!
//! Ctrl+C sets a shared flag; workers finish their in-flight command,
//! acknowledge it, and exit. Files not yet dequeued stay unprocessed.
//!
//! # Example
//!
//! ```bash
//! # Stamp a timelapse folder using 8 workers
//! timestamper /data/timelapse -c 8
//!
//! # Custom convert parameters from a config file
//! timestamper /data/timelapse --config params.yaml
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod progress;
pub mod stamp;

pub use config::{CliArgs, ConvertParams, StampConfig};
pub use convert::Annotator;
pub use error::{Result, StampOutcome, StamperError};
pub use stamp::{StampCoordinator, StampResult};
