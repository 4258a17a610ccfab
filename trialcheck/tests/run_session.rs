//! End-to-end runs of a full session against temp directories
//!
//! Services are mocked; data and backup sources are real files with
//! controlled modification times.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use trialcheck::console::StatusLog;
use trialcheck::gate::OperatorGate;
use trialcheck::runner::run_session;
use trialcheck_core::{dated_datalog_name, Result, ServiceStatus};
use trialcheck_services::ServiceController;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CountingGate(Arc<AtomicUsize>);

#[async_trait]
impl OperatorGate for CountingGate {
    async fn wait(&mut self) -> std::io::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Reports the listed services as running, everything else as stopped for good
struct FixedServices(Vec<&'static str>);

#[async_trait]
impl ServiceController for FixedServices {
    async fn query(&self, service: &str) -> Result<ServiceStatus> {
        if self.0.contains(&service) {
            Ok(ServiceStatus::Running)
        } else {
            Ok(ServiceStatus::NotRunning("STATE : 1 STOPPED".to_string()))
        }
    }

    async fn start(&self, _service: &str) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "fixed"
    }
}

struct Session {
    dir: TempDir,
    console: Captured,
    gate: CountingGate,
}

impl Session {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            console: Captured::default(),
            gate: CountingGate::default(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_config(&self, config: serde_json::Value) {
        std::fs::write(
            self.path().join("config.json"),
            serde_json::to_string_pretty(&config).unwrap(),
        )
        .unwrap();
    }

    async fn run(&self, running: Vec<&'static str>) -> trialcheck::runner::RunSummary {
        let log = StatusLog::with_console(self.path().join("log.txt"), Box::new(self.console.clone()));
        run_session(
            &self.path().join("config.json"),
            log,
            Arc::new(FixedServices(running)),
            self.gate.clone(),
        )
        .await
    }

    fn pauses(&self) -> usize {
        self.gate.0.load(Ordering::SeqCst)
    }

    fn status_log(&self) -> String {
        std::fs::read_to_string(self.path().join("log.txt")).unwrap()
    }
}

fn write_aged(path: &Path, content: &str, age: Duration) {
    let mut file = File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[tokio::test]
async fn healthy_station_reports_no_issues() {
    let session = Session::new();
    let gps = session.path().join("data").join("GPS");
    std::fs::create_dir_all(&gps).unwrap();
    write_aged(&gps.join("gps.csv"), "GPS,51.5,0.1\n", Duration::from_secs(10));

    session.write_config(serde_json::json!({
        "baseDataDir": session.path().join("data"),
        "dataDirs": ["GPS"],
        "serviceNames": ["Tardis"],
    }));

    let summary = session.run(vec!["Tardis"]).await;

    assert!(summary.all_healthy());
    assert_eq!(summary.records.len(), 2);
    // services, GPS, final
    assert_eq!(session.pauses(), 3);

    let shown = session.console.text();
    assert!(shown.contains("No issues found... All services running."));
    assert!(shown.contains("No issues found with GPS."));
    assert!(shown.contains("GPS,51.5,0.1"));
    assert!(shown.contains("All checks passed."));

    let logged = session.status_log();
    assert!(logged.contains("OK No issues found with GPS."));
    assert!(!logged.contains('\u{1b}'), "status log must be plain text");
}

#[tokio::test]
async fn stale_and_missing_sources_are_reported_and_run_continues() {
    let session = Session::new();
    let data = session.path().join("data");
    let ctd = data.join("CTD");
    std::fs::create_dir_all(&ctd).unwrap();
    write_aged(&ctd.join("cast.txt"), "old\n", Duration::from_secs(600));

    session.write_config(serde_json::json!({
        "baseDataDir": data,
        "dataDirs": ["CTD", "ADCP"],
        "serviceNames": ["Tardis", "AdvNMEADataLogger"],
    }));

    let summary = session.run(vec!["Tardis"]).await;

    assert!(summary.aborted.is_none());
    assert_eq!(summary.records.len(), 4);
    assert_eq!(summary.records.iter().filter(|r| !r.healthy).count(), 3);
    assert_eq!(session.pauses(), 4);

    let shown = session.console.text();
    assert!(shown.contains("[ref 2.1]"));
    assert!(shown.contains("[ref 1.1] No files in CTD have been updated in the last minute."));
    assert!(shown.contains("[ref 1.2]"));
    assert!(shown.contains("3 checks reported issues."));
}

#[tokio::test]
async fn com_port_datalog_is_checked() {
    let session = Session::new();
    let data = session.path().join("data");
    let com_dir = data.join("_COM3");
    std::fs::create_dir_all(&com_dir).unwrap();
    let name = dated_datalog_name("COM3", Utc::now());
    write_aged(
        &com_dir.join(name),
        "$GPGGA,123519,4807.038,N\n",
        Duration::from_secs(5),
    );

    session.write_config(serde_json::json!({
        "baseDataDir": data,
        "comPorts": ["COM3"],
        "serviceNames": [],
    }));

    let summary = session.run(vec![]).await;

    assert!(summary.all_healthy(), "{:?}", summary);
    assert!(session.console.text().contains("$GPGGA,123519,4807.038,N"));
}

#[tokio::test]
async fn backups_are_checked_when_configured() {
    let session = Session::new();
    let usb = session.path().join("usb");
    std::fs::create_dir_all(&usb).unwrap();
    let taken = Local::now().naive_local() - ChronoDuration::hours(30);
    std::fs::create_dir(usb.join(taken.format("%Y.%m.%d-%H.%M.%S").to_string())).unwrap();

    session.write_config(serde_json::json!({
        "serviceNames": [],
        "backupDir": usb,
    }));

    let summary = session.run(vec![]).await;

    assert_eq!(summary.records.len(), 1);
    assert!(!summary.records[0].healthy);
    // Backup stage has no pause of its own
    assert_eq!(session.pauses(), 2);
    assert!(session
        .console
        .text()
        .contains("[ref 3.1] A backup has not occurred in the last 24 hours!"));
}

#[tokio::test]
async fn missing_config_is_created_with_defaults() {
    let session = Session::new();

    let summary = session.run(vec!["Tardis", "AdvNMEADataLogger"]).await;

    assert!(summary.aborted.is_none());
    let written = std::fs::read_to_string(session.path().join("config.json")).unwrap();
    assert!(written.contains("AdvNMEADataLogger"));
    assert!(summary.records.iter().all(|r| r.healthy));
}

#[tokio::test]
async fn invalid_config_ends_the_run_cleanly() {
    let session = Session::new();
    session.write_config(serde_json::json!({
        "baseDataDir": "",
        "dataDirs": ["GPS"],
    }));

    let summary = session.run(vec![]).await;

    assert!(summary.aborted.is_some());
    assert_eq!(session.pauses(), 1);
    assert!(session
        .status_log()
        .contains("The following error was encountered during operation:"));
}
