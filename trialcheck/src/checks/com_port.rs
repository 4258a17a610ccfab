//! COM port datalog check
//!
//! Serial loggers write one file per hour to
//! `<baseDataDir>/_<COM>/<COM>-dataYYYYMMDDHH.log` (UTC). The current hour's
//! file must exist and have been written within the freshness window.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;
use trialcheck_core::{dated_datalog_name, Result, TrialCheckError, PREVIEW_LINES};

use super::preview::{preview_file, Preview};
use super::{file_age, is_fresh, Category, CheckRecord};
use crate::console::StatusLog;

/// Path of the datalog file `com` should be writing at `now`.
pub fn datalog_path(base_data_dir: &Path, com: &str, now: DateTime<Utc>) -> PathBuf {
    base_data_dir
        .join(format!("_{}", com))
        .join(dated_datalog_name(com, now))
}

/// Verify the datalog file exists and is fresh, returning its preview.
pub async fn inspect_datalog(path: &Path, com: &str, now: SystemTime) -> Result<Preview> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        debug!("stat {} failed: {}", path.display(), e);
        TrialCheckError::MissingDatalog {
            path: path.to_path_buf(),
        }
    })?;

    let age = file_age(metadata.modified()?, now);
    if !is_fresh(age) {
        return Err(TrialCheckError::StaleDatalog {
            source_name: com.to_string(),
        });
    }

    Ok(preview_file(path, PREVIEW_LINES, None).await?)
}

/// Check one COM port logger and report the outcome.
pub async fn check_com_port(
    log: &mut StatusLog,
    base_data_dir: &Path,
    com: &str,
    now: SystemTime,
) -> CheckRecord {
    log.info(&format!("Checking data is being logged from: {}...", com))
        .await;

    let path = datalog_path(base_data_dir, com, DateTime::<Utc>::from(now));
    match inspect_datalog(&path, com, now).await {
        Ok(preview) => {
            match preview {
                Preview::Text(text) => {
                    log.ok(&format!(
                        "No issues found with {}. Here are the latest {} lines to check if sensible data is being logged.\nRefer to Trial Instructions (Annex A) for examples:",
                        com, PREVIEW_LINES
                    ))
                    .await;
                    log.info(&format!("{}\n", text)).await;
                }
                Preview::NonText => {
                    log.ok(&format!(
                        "No issues found with {}. No preview displayed as data is non text",
                        com
                    ))
                    .await;
                }
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            CheckRecord::healthy(Category::ComPort, com, name)
        }
        Err(e) => {
            let message = match e.trial_ref() {
                Some(_) => e.with_ref(),
                None => format!("An unexpected error occurred when checking {}. {}!", com, e),
            };
            log.error(&message).await;
            log.error(&format!(
                "Issues were found with {}. Record the issue and refer to the Trial Instructions.",
                com
            ))
            .await;
            CheckRecord::issue(Category::ComPort, com, e.with_ref())
        }
    }
}
