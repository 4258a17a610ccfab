//! Service control abstraction
//!
//! Provides the trait implemented by each OS backend and the shared
//! command runner they use.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};
use trialcheck_core::{Result, ServiceStatus, TrialCheckError};

/// Trait for OS service control
///
/// This trait enables testing of `ServiceChecker` without touching real
/// services by allowing mock implementations.
#[async_trait]
pub trait ServiceController: Send + Sync {
    /// Query the current run state of a service
    async fn query(&self, service: &str) -> Result<ServiceStatus>;

    /// Ask the OS to start a service and wait for the command to finish
    async fn start(&self, service: &str) -> Result<()>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Best text to show the operator when the command did not succeed.
    pub fn failure_report(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.clone()
        } else if !self.stdout.trim().is_empty() {
            self.stdout.clone()
        } else {
            "command exited without output".to_string()
        }
    }
}

/// Run an external command to completion and capture its output
pub async fn run_command(program: &str, args: &[&str]) -> Result<CommandOutput> {
    debug!("Running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            error!("Failed to run {}: {}", program, e);
            TrialCheckError::Io(e)
        })?;

    let result = CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(
        "{} exited with success={} ({} bytes stdout, {} bytes stderr)",
        program,
        result.success,
        result.stdout.len(),
        result.stderr.len()
    );

    Ok(result)
}
