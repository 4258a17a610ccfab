//! Core types and thresholds shared by the checks

use std::fmt;
use std::time::Duration;

/// A data file must have been modified more recently than this to be fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Backups older than this many hours are stale.
pub const BACKUP_MAX_AGE_HOURS: i64 = 24;

/// Number of trailing lines shown in a data preview
pub const PREVIEW_LINES: usize = 20;

/// Maximum characters shown in a directory data preview
pub const PREVIEW_MAX_CHARS: usize = 1000;

/// Run state reported by the OS for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Service is running
    Running,
    /// Service is stopped, paused, missing, or the query failed.
    ///
    /// Holds whatever the OS reported so the operator can record it.
    NotRunning(String),
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ServiceStatus::Running)
    }

    /// Text reported by the OS, empty when running.
    pub fn report(&self) -> &str {
        match self {
            ServiceStatus::Running => "",
            ServiceStatus::NotRunning(report) => report.trim(),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Running => write!(f, "RUNNING"),
            ServiceStatus::NotRunning(report) => write!(f, "{}", report.trim()),
        }
    }
}

/// Outcome of checking one service, including the restart attempt if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    /// Service identifier
    pub name: String,
    /// Status before any restart
    pub initial: ServiceStatus,
    /// Status after the restart attempt, `None` if no restart was needed
    pub after_restart: Option<ServiceStatus>,
}

impl ServiceHealth {
    /// Whether a restart was attempted.
    pub fn restart_attempted(&self) -> bool {
        self.after_restart.is_some()
    }

    /// Final health: `true` if the service ended up running.
    pub fn is_healthy(&self) -> bool {
        match &self.after_restart {
            Some(status) => status.is_running(),
            None => self.initial.is_running(),
        }
    }

    /// Last status observed for the service.
    pub fn final_status(&self) -> &ServiceStatus {
        self.after_restart.as_ref().unwrap_or(&self.initial)
    }
}
