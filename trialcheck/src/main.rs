//! Trialcheck
//!
//! Runs every trial check once, pausing between stages for the operator.
//! The process always exits with status 0; problems are reported on the
//! console and in the status log.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error};
use trialcheck::config::SessionPaths;
use trialcheck::console::StatusLog;
use trialcheck::gate::KeypressGate;
use trialcheck::runner::run_session;
use trialcheck_services::{platform_controller, ServiceController};

/// Field-trial status check
#[derive(Parser, Debug)]
#[command(name = "trialcheck")]
#[command(version, about = "Check trial services, data loggers and backups", long_about = None)]
struct Args {
    /// Path to the JSON config file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the status log
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return;
        }
    };

    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("trialcheck could not start: {:#}", e);
    }
}

fn run(args: Args) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let paths = SessionPaths::resolve(args.config, args.log_file);
    debug!(
        "Config: {}, status log: {}",
        paths.config.display(),
        paths.log.display()
    );

    let controller = platform_controller();
    debug!("Service backend: {}", controller.backend_name());

    let summary = runtime.block_on(run_session(
        &paths.config,
        StatusLog::new(paths.log),
        controller,
        KeypressGate::new(),
    ));

    debug!(
        "Run finished: {} checks, healthy: {}",
        summary.records.len(),
        summary.all_healthy()
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
