//! Windows Service Control Manager backend
//!
//! Queries with `sc query <name>` and starts with `net start <name>`.

use async_trait::async_trait;
use tracing::debug;
use trialcheck_core::{Result, ServiceStatus};

use crate::controller::{run_command, CommandOutput, ServiceController};

/// Service controller driving `sc.exe` and `net.exe`
#[derive(Debug, Default, Clone)]
pub struct ScController;

impl ScController {
    pub fn new() -> Self {
        Self
    }
}

/// Interpret the output of `sc query`.
///
/// A failing query (unknown service, access denied) is reported as not
/// running with the error text.
pub fn parse_sc_query(output: &CommandOutput) -> ServiceStatus {
    if !output.success {
        return ServiceStatus::NotRunning(output.failure_report());
    }
    if output.stdout.contains("RUNNING") {
        ServiceStatus::Running
    } else {
        ServiceStatus::NotRunning(output.stdout.clone())
    }
}

#[async_trait]
impl ServiceController for ScController {
    async fn query(&self, service: &str) -> Result<ServiceStatus> {
        let output = run_command("sc", &["query", service]).await?;
        Ok(parse_sc_query(&output))
    }

    async fn start(&self, service: &str) -> Result<()> {
        let output = run_command("net", &["start", service]).await?;
        if !output.success {
            debug!("net start {} failed: {}", service, output.failure_report().trim());
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sc"
    }
}
