//! The individual status checks run by the runner
//!
//! - [`services`] - service health and the single restart attempt
//! - [`data_dir`] - newest file in a data directory
//! - [`com_port`] - hourly dated datalog file of a COM port logger
//! - [`backup`] - age of the newest backup entry
//!
//! Every check reports to the [`StatusLog`](crate::console::StatusLog) as it
//! goes and returns a [`CheckRecord`] for the end-of-run summary. Errors are
//! reported where they occur and never propagated.

pub mod backup;
pub mod com_port;
pub mod data_dir;
pub mod preview;
pub mod services;

use std::fmt;
use std::time::{Duration, SystemTime};
use trialcheck_core::FRESHNESS_WINDOW;

/// Kind of check a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Service,
    DataDir,
    ComPort,
    Backup,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Service => "Service",
            Category::DataDir => "Data directory",
            Category::ComPort => "COM port",
            Category::Backup => "Backup",
        };
        f.write_str(name)
    }
}

/// Outcome of one check, kept only for the summary table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub category: Category,
    pub subject: String,
    pub healthy: bool,
    pub detail: String,
}

impl CheckRecord {
    pub fn healthy(category: Category, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            category,
            subject: subject.into(),
            healthy: true,
            detail: detail.into(),
        }
    }

    pub fn issue(category: Category, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            category,
            subject: subject.into(),
            healthy: false,
            detail: detail.into(),
        }
    }
}

/// Time since `mtime`. Modification times in the future count as zero.
pub fn file_age(mtime: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(mtime).unwrap_or(Duration::ZERO)
}

/// Whether a file of this age is inside the freshness window.
pub fn is_fresh(age: Duration) -> bool {
    age < FRESHNESS_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_boundary() {
        assert!(is_fresh(Duration::ZERO));
        assert!(is_fresh(Duration::from_millis(59_999)));
        assert!(!is_fresh(Duration::from_millis(60_000)));
        assert!(!is_fresh(Duration::from_secs(300)));
    }

    #[test]
    fn test_future_mtime_is_fresh() {
        let now = SystemTime::now();
        let future = now + Duration::from_secs(30);
        assert_eq!(file_age(future, now), Duration::ZERO);
        assert!(is_fresh(file_age(future, now)));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::DataDir.to_string(), "Data directory");
        assert_eq!(Category::ComPort.to_string(), "COM port");
    }
}
