//! Error types for the trial status checker

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for trial status checks
///
/// Each variant that maps onto a numbered step of the Trial Instructions
/// exposes that reference through [`TrialCheckError::trial_ref`].
#[derive(Error, Debug)]
pub enum TrialCheckError {
    /// Service not running and the restart attempt did not bring it back
    #[error("Service {service} is not running! Failed to automatically restart! Service reported: \n{report}")]
    ServiceUnavailable { service: String, report: String },

    /// No file in a data source was modified within the freshness window
    #[error("No files in {source_name} have been updated in the last minute.")]
    StaleData { source_name: String },

    /// Dated datalog file exists but was not modified within the freshness window
    #[error("{source_name} datalog file has not been updated in the last minute.")]
    StaleDatalog { source_name: String },

    /// Freshest backup is older than the allowed age
    #[error("A backup has not occurred in the last 24 hours!")]
    StaleBackup,

    /// Expected file or directory is absent
    #[error("{} does not exist!", path.display())]
    MissingSource { path: PathBuf },

    /// Dated datalog file is absent
    #[error("{} datalog file does not exist!", path.display())]
    MissingDatalog { path: PathBuf },

    /// Backup directory cannot be read (removable media unplugged)
    #[error("Backup USB not connected!")]
    BackupMediaMissing { path: PathBuf },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TrialCheckError {
    /// Trial Instructions reference for this error, if it has one.
    pub fn trial_ref(&self) -> Option<&'static str> {
        match self {
            Self::StaleData { .. } | Self::StaleDatalog { .. } => Some("1.1"),
            Self::MissingSource { .. } | Self::MissingDatalog { .. } => Some("1.2"),
            Self::ServiceUnavailable { .. } => Some("2.1"),
            Self::StaleBackup => Some("3.1"),
            Self::BackupMediaMissing { .. } => Some("3.2"),
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) | Self::Other(_) => None,
        }
    }

    /// Message prefixed with its `[ref x.y]` tag when one applies.
    pub fn with_ref(&self) -> String {
        match self.trial_ref() {
            Some(r) => format!("[ref {}] {}", r, self),
            None => self.to_string(),
        }
    }
}

/// Result type alias for trial check operations
pub type Result<T> = std::result::Result<T, TrialCheckError>;

impl From<serde_json::Error> for TrialCheckError {
    fn from(err: serde_json::Error) -> Self {
        TrialCheckError::Serialization(err.to_string())
    }
}
