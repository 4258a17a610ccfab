//! Trialcheck Core Library
//!
//! Shared types, configuration and errors for the field-trial status checker.
//! Used by the service control backends and the operator CLI.

pub mod config;
pub mod error;
pub mod stamp;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, default_log_path, TrialConfig};
pub use error::*;
pub use stamp::{dated_datalog_name, freshest_backup, parse_backup_stamp, BackupAge};
pub use types::*;
