//! External image command invocation
//!
//! The actual timestamp overlay is delegated to ImageMagick's `convert`
//! (or whatever `--tool` names). The invocation is equivalent to:
//!
//! ```text
//! convert <path> <params...> <path>
//! ```
//!
//! i.e. the file is rewritten in place. The command is spawned directly
//! (no shell) and waited on synchronously; a non-zero exit status or a
//! spawn failure is a per-file outcome, never fatal to the run.

use crate::error::StampOutcome;
use std::path::Path;
use std::process::{Command, Stdio};

/// Invokes the external image command on single files
#[derive(Debug, Clone)]
pub struct Annotator {
    /// Command name or path (e.g. "convert")
    tool: String,

    /// Arguments inserted between the input and output path
    params: Vec<String>,
}

impl Annotator {
    /// Create an annotator for the given tool and parameters
    pub fn new(tool: String, params: Vec<String>) -> Self {
        Self { tool, params }
    }

    /// The configured tool name
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Run the command synchronously on one file, writing back in place
    pub fn stamp(&self, path: &Path) -> StampOutcome {
        let status = Command::new(&self.tool)
            .arg(path)
            .args(&self.params)
            .arg(path)
            .stdin(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => StampOutcome::Success {
                path: path.to_path_buf(),
            },
            Ok(status) => StampOutcome::Failed {
                path: path.to_path_buf(),
                reason: match status.code() {
                    Some(code) => format!("{} exited with status {}", self.tool, code),
                    None => format!("{} terminated by signal", self.tool),
                },
            },
            Err(e) => StampOutcome::Failed {
                path: path.to_path_buf(),
                reason: format!("failed to spawn {}: {}", self.tool, e),
            },
        }
    }

    /// Render the full command line for one file (for verbose logging)
    pub fn command_line(&self, path: &Path) -> String {
        let mut parts = Vec::with_capacity(self.params.len() + 3);
        parts.push(self.tool.clone());
        parts.push(format!("\"{}\"", path.display()));
        parts.extend(self.params.iter().cloned());
        parts.push(format!("\"{}\"", path.display()));
        parts.join(" ")
    }
}
