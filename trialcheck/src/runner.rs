//! Runner - sequences the checks
//!
//! ```text
//! ServiceCheck ─pause─▶ DataChecks (pause after each source) ─▶ BackupCheck? ─▶ Summary ─pause─▶ Exit
//! ```
//!
//! Problems found by a check are reported and the run continues. Anything
//! that escapes a stage is logged, followed by one last pause, and the run
//! ends normally.

use chrono::Local;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error, warn};
use trialcheck_core::TrialConfig;
use trialcheck_services::{ServiceChecker, ServiceController};

use crate::checks::backup::check_backups;
use crate::checks::com_port::check_com_port;
use crate::checks::data_dir::check_data_dir;
use crate::checks::services::check_services;
use crate::checks::CheckRecord;
use crate::config::load_or_create;
use crate::console::StatusLog;
use crate::format::{format_summary, format_verdict};
use crate::gate::OperatorGate;

/// Stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ServiceCheck,
    DataChecks,
    BackupCheck,
    Summary,
    Exit,
}

impl Stage {
    /// Stage that follows this one for the given config.
    pub fn next(self, config: &TrialConfig) -> Stage {
        match self {
            Stage::ServiceCheck => Stage::DataChecks,
            Stage::DataChecks if config.backups_enabled() => Stage::BackupCheck,
            Stage::DataChecks | Stage::BackupCheck => Stage::Summary,
            Stage::Summary | Stage::Exit => Stage::Exit,
        }
    }
}

/// What a run found
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// One record per check that completed
    pub records: Vec<CheckRecord>,
    /// Set when the run ended early because of an unexpected error
    pub aborted: Option<String>,
}

impl RunSummary {
    /// Whether the run completed and every check was healthy.
    pub fn all_healthy(&self) -> bool {
        self.aborted.is_none() && self.records.iter().all(|r| r.healthy)
    }
}

/// Log the continue prompt and wait on the gate.
pub async fn pause<G: OperatorGate + ?Sized>(log: &mut StatusLog, gate: &mut G) {
    log.info("Press any key to continue...").await;
    if let Err(e) = gate.wait().await {
        warn!("Waiting for the operator failed: {}", e);
    }
}

async fn report_fatal<G: OperatorGate + ?Sized>(log: &mut StatusLog, gate: &mut G, reason: &str) {
    error!("Run aborted: {}", reason);
    log.error(&format!(
        "The following error was encountered during operation: {}",
        reason
    ))
    .await;
    pause(log, gate).await;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown internal error".to_string()
    }
}

/// Runs every stage against one loaded config
pub struct Runner<G: OperatorGate> {
    config: TrialConfig,
    log: StatusLog,
    services: ServiceChecker,
    gate: G,
    records: Vec<CheckRecord>,
}

impl<G: OperatorGate> Runner<G> {
    pub fn new(config: TrialConfig, log: StatusLog, services: ServiceChecker, gate: G) -> Self {
        Self {
            config,
            log,
            services,
            gate,
            records: Vec::new(),
        }
    }

    /// Run all stages to completion.
    pub async fn run(mut self) -> RunSummary {
        let mut stage = Stage::ServiceCheck;

        while stage != Stage::Exit {
            debug!("Entering stage {:?}", stage);

            let outcome = AssertUnwindSafe(self.run_stage(stage)).catch_unwind().await;
            if let Err(payload) = outcome {
                let reason = panic_message(payload.as_ref());
                report_fatal(&mut self.log, &mut self.gate, &reason).await;
                return RunSummary {
                    records: self.records,
                    aborted: Some(reason),
                };
            }

            stage = stage.next(&self.config);
        }

        RunSummary {
            records: self.records,
            aborted: None,
        }
    }

    async fn run_stage(&mut self, stage: Stage) {
        match stage {
            Stage::ServiceCheck => {
                let records =
                    check_services(&mut self.log, &self.services, &self.config.service_names)
                        .await;
                self.records.extend(records);
                pause(&mut self.log, &mut self.gate).await;
            }
            Stage::DataChecks => {
                for com in &self.config.com_ports {
                    let record = check_com_port(
                        &mut self.log,
                        &self.config.base_data_dir,
                        com,
                        SystemTime::now(),
                    )
                    .await;
                    self.records.push(record);
                    pause(&mut self.log, &mut self.gate).await;
                }
                for dir in &self.config.data_dirs {
                    let record =
                        check_data_dir(&mut self.log, &self.config, dir, SystemTime::now()).await;
                    self.records.push(record);
                    pause(&mut self.log, &mut self.gate).await;
                }
            }
            Stage::BackupCheck => {
                let record = check_backups(
                    &mut self.log,
                    &self.config.backup_dir,
                    &Local::now(),
                )
                .await;
                self.records.push(record);
            }
            Stage::Summary => {
                self.log.info(&format_summary(&self.records)).await;
                let verdict = format_verdict(&self.records);
                if self.records.iter().all(|r| r.healthy) {
                    self.log.ok(&verdict).await;
                } else {
                    self.log.error(&verdict).await;
                }
                pause(&mut self.log, &mut self.gate).await;
            }
            Stage::Exit => {}
        }
    }
}

/// Load the config and run every check.
///
/// Never fails: a config that cannot be loaded is reported like any other
/// unexpected error.
pub async fn run_session<G: OperatorGate>(
    config_path: &Path,
    mut log: StatusLog,
    controller: Arc<dyn ServiceController>,
    mut gate: G,
) -> RunSummary {
    match load_or_create(config_path).await {
        Ok(config) => {
            Runner::new(config, log, ServiceChecker::new(controller), gate)
                .run()
                .await
        }
        Err(e) => {
            let reason = e.to_string();
            report_fatal(&mut log, &mut gate, &reason).await;
            RunSummary {
                records: Vec::new(),
                aborted: Some(reason),
            }
        }
    }
}
