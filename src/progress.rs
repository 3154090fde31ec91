//! Progress reporting for the timestamping run
//!
//! Provides a spinner while the join is pending plus styled header and
//! summary output around the run.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays run status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a header before the run blocks on the join
pub fn print_header(directory: &str, workers: usize, queued: u64, tool: &str) {
    println!();
    println!(
        "{} {}",
        style("timestamper").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Concurrency:").bold(), workers);
    println!("  {} {}", style("Files queued:").bold(), queued);
    println!("  {} {}", style("Directory:").bold(), directory);
    println!("  {} {}", style("Tool:").bold(), tool);
    println!();
}

/// Print a summary of the run results
pub fn print_summary(
    processed: u64,
    failed: u64,
    total_queued: u64,
    duration: Duration,
    completed: bool,
) {
    let duration_secs = duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        processed as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    if completed {
        println!("{}", style("Run Complete").green().bold());
    } else {
        println!("{}", style("Run Interrupted").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Stamped:").bold(), processed);
    if failed > 0 {
        println!("  {} {}", style("Failed:").yellow().bold(), failed);
    }
    if !completed {
        let remaining = total_queued.saturating_sub(processed + failed);
        println!("  {} {}", style("Unprocessed:").bold(), remaining);
    }
    println!(
        "  {} {:.1}s ({:.1} files/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    println!();
}
