//! Configuration types for the trial status checker
//!
//! - [`TrialConfig`] - services, data sources and backup location, loaded once
//! - [`paths`] - default locations of the config and log files

mod paths;
mod trial_config;

pub use paths::{default_config_path, default_log_path, CONFIG_PATH_ENV, LOG_PATH_ENV};
pub use trial_config::{TrialConfig, DEFAULT_BASE_DATA_DIR, DEFAULT_SERVICE_NAMES};
