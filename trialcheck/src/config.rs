//! Session configuration
//!
//! Resolves where the config and log files live and loads the trial config,
//! creating it with defaults on first run.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use trialcheck_core::config::{
    default_config_path, default_log_path, TrialConfig, CONFIG_PATH_ENV, LOG_PATH_ENV,
};
use trialcheck_core::{Result, TrialCheckError};

/// File locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    /// JSON trial config
    pub config: PathBuf,
    /// Append-only status log
    pub log: PathBuf,
}

impl Default for SessionPaths {
    fn default() -> Self {
        Self {
            config: default_config_path(),
            log: default_log_path(),
        }
    }
}

impl SessionPaths {
    /// Resolve paths using the priority chain: CLI flag → environment → default.
    pub fn resolve(config_flag: Option<PathBuf>, log_flag: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            config: config_flag
                .or_else(|| env_path(CONFIG_PATH_ENV))
                .unwrap_or(defaults.config),
            log: log_flag
                .or_else(|| env_path(LOG_PATH_ENV))
                .unwrap_or(defaults.log),
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Load the trial config, creating it with defaults if it does not exist.
///
/// The loaded config is validated before it is returned.
pub async fn load_or_create(path: &Path) -> Result<TrialConfig> {
    if !path.exists() {
        info!(
            "Config not found at {}. Creating with defaults.",
            path.display()
        );

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                TrialCheckError::Config(format!(
                    "Failed to create config directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let config = TrialConfig::default();
        fs::write(path, config.to_json()?).await.map_err(|e| {
            TrialCheckError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        return Ok(config);
    }

    let content = fs::read_to_string(path).await.map_err(|e| {
        TrialCheckError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config = TrialConfig::from_json(&content).map_err(|e| {
        TrialCheckError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    config.validate()?;

    debug!(
        "Config loaded: {} services, {} data dirs, {} COM ports, backups {}",
        config.service_names.len(),
        config.data_dirs.len(),
        config.com_ports.len(),
        if config.backups_enabled() { "on" } else { "off" }
    );
    Ok(config)
}
