//! timestamper - Parallel JPEG Timestamp Overlay
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use timestamper::config::{CliArgs, StampConfig};
use timestamper::progress::{print_header, print_summary, ProgressReporter};
use timestamper::stamp::StampCoordinator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config (also loads config.yaml convert params)
    let config = StampConfig::from_args(args).context("Invalid configuration")?;
    let show_progress = config.show_progress;

    // Create coordinator - enumerates the directory and fills the queue.
    // A missing or unreadable directory fails here, before any worker runs.
    let coordinator = StampCoordinator::new(config.clone())
        .context("Failed to initialize timestamping run")?;

    // Setup signal handler for graceful shutdown. Only this handler ever
    // sets the flag; the workers merely poll it.
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nCtrl+C pressed! Shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Print the run header before blocking on the join
    if show_progress {
        print_header(
            &config.directory.display().to_string(),
            config.worker_count,
            coordinator.queued_files(),
            &config.tool,
        );
    }

    let progress = if show_progress {
        Some(ProgressReporter::new())
    } else {
        None
    };

    if let Some(ref p) = progress {
        p.set_status("Timestamping files...");
    }

    // Run: spawns the workers and blocks until all files are acknowledged
    let result = coordinator.run().context("Timestamping run failed")?;

    if let Some(ref p) = progress {
        if result.completed {
            p.finish("All files processed");
        } else {
            p.finish("Interrupted");
        }
    }

    if show_progress {
        print_summary(
            result.processed,
            result.failed,
            result.total_queued,
            result.duration,
            result.completed,
        );
    }

    if !result.completed {
        info!("Run was interrupted before completion");
    }

    if result.failed > 0 {
        info!(failed = result.failed, "Run completed with per-file errors");
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("timestamper=debug,warn")
    } else {
        EnvFilter::new("timestamper=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
