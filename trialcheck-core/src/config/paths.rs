//! Default path resolution for the config and log files
//!
//! Both live next to the working directory the operator launches from.

use std::path::PathBuf;

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "TRIALCHECK_CONFIG";

/// Environment variable overriding the log file path.
pub const LOG_PATH_ENV: &str = "TRIALCHECK_LOG_FILE";

/// Returns the default path of the JSON config file: `./config.json`.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".").join("config.json")
}

/// Returns the default path of the append-only status log: `./log.txt`.
pub fn default_log_path() -> PathBuf {
    PathBuf::from(".").join("log.txt")
}
