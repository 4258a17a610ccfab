//! systemd backend
//!
//! Queries with `systemctl is-active <name>` and starts with
//! `systemctl start <name>`.

use async_trait::async_trait;
use tracing::debug;
use trialcheck_core::{Result, ServiceStatus};

use crate::controller::{run_command, CommandOutput, ServiceController};

/// Service controller driving `systemctl`
#[derive(Debug, Default, Clone)]
pub struct SystemctlController;

impl SystemctlController {
    pub fn new() -> Self {
        Self
    }
}

/// Interpret the output of `systemctl is-active`.
///
/// `is-active` exits non-zero for every state but `active`, so the state
/// word on stdout is what gets reported.
pub fn parse_is_active(output: &CommandOutput) -> ServiceStatus {
    let state = output.stdout.trim();
    if output.success && state == "active" {
        return ServiceStatus::Running;
    }
    if state.is_empty() {
        ServiceStatus::NotRunning(output.failure_report())
    } else {
        ServiceStatus::NotRunning(state.to_string())
    }
}

#[async_trait]
impl ServiceController for SystemctlController {
    async fn query(&self, service: &str) -> Result<ServiceStatus> {
        let output = run_command("systemctl", &["is-active", service]).await?;
        Ok(parse_is_active(&output))
    }

    async fn start(&self, service: &str) -> Result<()> {
        let output = run_command("systemctl", &["start", service]).await?;
        if !output.success {
            debug!(
                "systemctl start {} failed: {}",
                service,
                output.failure_report().trim()
            );
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "systemctl"
    }
}
