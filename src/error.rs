//! Error types for timestamper
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what to do
//! - Per-file failures are outcomes, not errors: they never abort the run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the timestamper application
#[derive(Error, Debug)]
pub enum StamperError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Directory listing failed - fatal, no partial processing
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid concurrency {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Target directory missing or not a directory
    #[error("Invalid directory '{path}': {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found: '{path}'")]
    ConfigFileMissing { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file '{path}': {reason}")]
    ConfigFileRead { path: PathBuf, reason: String },

    /// Configuration file did not parse
    #[error("Malformed configuration file '{path}': {reason}")]
    MalformedConfig { path: PathBuf, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker initialization failed
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },

    /// Work queue send failed
    #[error("Failed to send work item: queue closed")]
    QueueSendFailed,
}

/// Result type alias for StamperError
pub type Result<T> = std::result::Result<T, StamperError>;

/// Represents the outcome of stamping a single file
#[derive(Debug)]
pub enum StampOutcome {
    /// The external command succeeded
    Success { path: PathBuf },

    /// The external command failed or could not be spawned
    Failed { path: PathBuf, reason: String },
}

impl StampOutcome {
    /// Returns true if this outcome represents success
    pub fn is_success(&self) -> bool {
        matches!(self, StampOutcome::Success { .. })
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &PathBuf {
        match self {
            StampOutcome::Success { path } => path,
            StampOutcome::Failed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success() {
        let outcome = StampOutcome::Success {
            path: PathBuf::from("/photos/a.jpg"),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.path(), &PathBuf::from("/photos/a.jpg"));
    }

    #[test]
    fn test_error_conversion() {
        let cfg_err = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        let err: StamperError = cfg_err.into();
        assert!(matches!(err, StamperError::Config(_)));
    }
}
