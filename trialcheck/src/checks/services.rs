//! Service stage reporting
//!
//! The checks themselves run concurrently in
//! [`ServiceChecker::check_all`]; their outcomes are reported here one
//! service at a time so the console stays in configuration order.

use trialcheck_core::{ServiceHealth, TrialCheckError};
use trialcheck_services::{ServiceChecker, ServiceController};

use super::{Category, CheckRecord};
use crate::console::StatusLog;

/// Write the status lines for one service.
pub async fn report_service(log: &mut StatusLog, health: &ServiceHealth) -> CheckRecord {
    log.info(&format!("Checking service {} is running...", health.name))
        .await;

    let Some(after) = &health.after_restart else {
        log.ok("RUNNING!").await;
        return CheckRecord::healthy(Category::Service, &health.name, "running");
    };

    log.warn(&format!(
        "Service {} reported: \n{}\nAttempting to restart...",
        health.name,
        health.initial.report()
    ))
    .await;

    if after.is_running() {
        log.warn(&format!("Service {} restarted successfully!", health.name))
            .await;
        return CheckRecord::healthy(Category::Service, &health.name, "restarted");
    }

    let err = TrialCheckError::ServiceUnavailable {
        service: health.name.clone(),
        report: after.report().to_string(),
    };
    log.error(&err.with_ref()).await;
    CheckRecord::issue(Category::Service, &health.name, "not running, restart failed")
}

/// Check all services and report them, followed by the stage summary line.
pub async fn check_services<C>(
    log: &mut StatusLog,
    checker: &ServiceChecker<C>,
    services: &[String],
) -> Vec<CheckRecord>
where
    C: ServiceController + ?Sized,
{
    log.info("Checking that all services are running...").await;

    let results = checker.check_all(services).await;
    let mut records = Vec::with_capacity(results.len());
    for health in &results {
        records.push(report_service(log, health).await);
    }

    if records.iter().all(|r| r.healthy) {
        log.ok("No issues found... All services running.").await;
    } else {
        log.error("Issues were found. Record the issue(s) above and refer to the Trial Instructions if a service did not restart")
            .await;
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::test_support::SharedBuffer;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use trialcheck_core::{Result, ServiceStatus};

    /// Mock controller: services listed in `restartable` come up after a start
    struct MockController {
        running: Mutex<HashMap<String, bool>>,
        restartable: Vec<String>,
        starts: Mutex<Vec<String>>,
    }

    impl MockController {
        fn new(running: &[&str], stopped: &[&str], restartable: &[&str]) -> Self {
            let mut map = HashMap::new();
            for s in running {
                map.insert(s.to_string(), true);
            }
            for s in stopped {
                map.insert(s.to_string(), false);
            }
            Self {
                running: Mutex::new(map),
                restartable: restartable.iter().map(|s| s.to_string()).collect(),
                starts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ServiceController for MockController {
        async fn query(&self, service: &str) -> Result<ServiceStatus> {
            let running = self.running.lock().unwrap().get(service).copied();
            Ok(match running {
                Some(true) => ServiceStatus::Running,
                Some(false) => ServiceStatus::NotRunning("STATE : 1 STOPPED".to_string()),
                None => ServiceStatus::NotRunning("FAILED 1060".to_string()),
            })
        }

        async fn start(&self, service: &str) -> Result<()> {
            self.starts.lock().unwrap().push(service.to_string());
            if self.restartable.iter().any(|s| s == service) {
                self.running.lock().unwrap().insert(service.to_string(), true);
            }
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "mock"
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_running() {
        let dir = tempfile::tempdir().unwrap();
        let console = SharedBuffer::default();
        let mut log = StatusLog::with_console(dir.path().join("log.txt"), Box::new(console.clone()));
        let mock = Arc::new(MockController::new(&["Tardis", "AdvNMEADataLogger"], &[], &[]));
        let checker = ServiceChecker::new(Arc::clone(&mock));

        let records = check_services(&mut log, &checker, &names(&["Tardis", "AdvNMEADataLogger"])).await;

        assert!(records.iter().all(|r| r.healthy));
        assert!(mock.starts.lock().unwrap().is_empty());
        let shown = console.contents();
        assert!(shown.contains("Checking service Tardis is running..."));
        assert!(shown.contains("RUNNING!"));
        assert!(shown.contains("No issues found... All services running."));
    }

    #[tokio::test]
    async fn test_restart_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let console = SharedBuffer::default();
        let mut log = StatusLog::with_console(dir.path().join("log.txt"), Box::new(console.clone()));
        let mock = Arc::new(MockController::new(
            &["Tardis"],
            &["npsrcsvr", "AdvNMEADataLogger"],
            &["npsrcsvr"],
        ));
        let checker = ServiceChecker::new(Arc::clone(&mock));

        let records = check_services(
            &mut log,
            &checker,
            &names(&["Tardis", "npsrcsvr", "AdvNMEADataLogger"]),
        )
        .await;

        let health: Vec<bool> = records.iter().map(|r| r.healthy).collect();
        assert_eq!(health, vec![true, true, false]);

        let mut starts = mock.starts.lock().unwrap().clone();
        starts.sort();
        assert_eq!(starts, vec!["AdvNMEADataLogger", "npsrcsvr"]);

        let shown = console.contents();
        assert!(shown.contains("Service npsrcsvr reported: \nSTATE : 1 STOPPED\nAttempting to restart..."));
        assert!(shown.contains("Service npsrcsvr restarted successfully!"));
        assert!(shown.contains(
            "[ref 2.1] Service AdvNMEADataLogger is not running! Failed to automatically restart!"
        ));
        assert!(shown.contains("Issues were found. Record the issue(s) above"));

        // Reports come out in configuration order
        let tardis = shown.find("Checking service Tardis").unwrap();
        let nport = shown.find("Checking service npsrcsvr").unwrap();
        let nmea = shown.find("Checking service AdvNMEADataLogger").unwrap();
        assert!(tardis < nport && nport < nmea);
    }
}
