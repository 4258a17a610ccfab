//! Trial configuration loaded once at startup
//!
//! Stored as JSON with camelCase keys so existing `config.json` files from the
//! field laptops keep working.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TrialCheckError};

/// Default base directory for the serial data loggers.
pub const DEFAULT_BASE_DATA_DIR: &str = "C:\\DataLog";

/// Services checked when the config file does not list any.
pub const DEFAULT_SERVICE_NAMES: [&str; 2] = ["Tardis", "AdvNMEADataLogger"];

fn default_base_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BASE_DATA_DIR)
}

fn default_service_names() -> Vec<String> {
    DEFAULT_SERVICE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Trial configuration.
///
/// Read-only after load; the operator edits the file between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialConfig {
    /// Directory containing one sub-directory per data source
    #[serde(default = "default_base_data_dir")]
    pub base_data_dir: PathBuf,

    /// Data directories (relative to `base_data_dir`) checked for a fresh file
    #[serde(default)]
    pub data_dirs: Vec<String>,

    /// COM ports whose hourly `<COM>-dataYYYYMMDDHH.log` file is checked
    #[serde(default)]
    pub com_ports: Vec<String>,

    /// OS service identifiers that must be running
    #[serde(default = "default_service_names")]
    pub service_names: Vec<String>,

    /// Backup directory; empty disables the backup check
    #[serde(default)]
    pub backup_dir: PathBuf,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            base_data_dir: default_base_data_dir(),
            data_dirs: Vec::new(),
            com_ports: Vec::new(),
            service_names: default_service_names(),
            backup_dir: PathBuf::new(),
        }
    }
}

impl TrialConfig {
    /// Parse from a JSON string. Missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the runner relies on.
    pub fn validate(&self) -> Result<()> {
        let needs_base = !self.data_dirs.is_empty() || !self.com_ports.is_empty();
        if needs_base && self.base_data_dir.as_os_str().is_empty() {
            return Err(TrialCheckError::Config(
                "baseDataDir must be specified!".to_string(),
            ));
        }

        if let Some(name) = self.service_names.iter().find(|s| s.trim().is_empty()) {
            return Err(TrialCheckError::Config(format!(
                "serviceNames contains an empty entry: {:?}",
                name
            )));
        }

        Ok(())
    }

    /// Whether a backup directory has been configured.
    pub fn backups_enabled(&self) -> bool {
        !self.backup_dir.as_os_str().is_empty()
    }

    /// Full path of a configured data directory.
    pub fn data_dir_path(&self, dir: &str) -> PathBuf {
        self.base_data_dir.join(dir)
    }
}
