//! Trialcheck
//!
//! Operator-run status check for a field-trial logging station. One run
//! verifies that the logging services are up, that every configured data
//! source has been written to in the last minute, and that a backup has been
//! taken in the last 24 hours.
//!
//! Findings are shown on the console with colour coding and appended to a
//! plain text status log. The run pauses for a keypress between stages so the
//! operator can record what was reported.
//!
//! ```no_run
//! use std::path::Path;
//! use trialcheck::console::StatusLog;
//! use trialcheck::gate::KeypressGate;
//! use trialcheck::runner::run_session;
//! use trialcheck_services::platform_controller;
//!
//! # async fn example() {
//! let log = StatusLog::new("log.txt");
//! let summary = run_session(
//!     Path::new("config.json"),
//!     log,
//!     platform_controller(),
//!     KeypressGate::new(),
//! )
//! .await;
//! println!("healthy: {}", summary.all_healthy());
//! # }
//! ```

/// Individual checks and their status reporting.
pub mod checks;

/// Config and log file resolution.
pub mod config;

/// Colour console plus append-only status log.
pub mod console;

// Summary table rendering
#[doc(hidden)]
pub mod format;

/// Keypress pauses between stages.
pub mod gate;

/// Stage sequencing and top-level error handling.
pub mod runner;
