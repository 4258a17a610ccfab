//! Data directory check
//!
//! Finds the most recently modified file in `<baseDataDir>/<dir>`, requires
//! it to be inside the freshness window and previews its tail.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::debug;
use trialcheck_core::{Result, TrialCheckError, TrialConfig, PREVIEW_LINES, PREVIEW_MAX_CHARS};

use super::preview::{preview_file, Preview};
use super::{file_age, is_fresh, Category, CheckRecord};
use crate::console::StatusLog;

/// Newest file found inside the freshness window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshFile {
    pub path: PathBuf,
    pub age: Duration,
}

impl FreshFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Find the most recently modified regular file in `dir` that is still fresh.
///
/// Returns `Ok(None)` when the directory is empty or nothing is fresh.
pub async fn find_freshest_file(dir: &Path, now: SystemTime) -> Result<Option<FreshFile>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => TrialCheckError::MissingSource {
            path: dir.to_path_buf(),
        },
        _ => TrialCheckError::Io(e),
    })?;

    let mut freshest: Option<FreshFile> = None;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let age = file_age(metadata.modified()?, now);
        debug!("{} modified {:?} ago", path.display(), age);
        if !is_fresh(age) {
            continue;
        }
        if freshest.as_ref().map_or(true, |f| age < f.age) {
            freshest = Some(FreshFile { path, age });
        }
    }

    Ok(freshest)
}

/// Check one configured data directory and report the outcome.
pub async fn check_data_dir(
    log: &mut StatusLog,
    config: &TrialConfig,
    dir: &str,
    now: SystemTime,
) -> CheckRecord {
    log.info(&format!("Checking data is being logged in: {}...", dir))
        .await;

    let path = config.data_dir_path(dir);
    let result = match find_freshest_file(&path, now).await {
        Ok(Some(fresh)) => report_fresh(log, dir, &fresh).await,
        Ok(None) => Err(TrialCheckError::StaleData {
            source_name: dir.to_string(),
        }),
        Err(e) => Err(e),
    };

    match result {
        Ok(record) => record,
        Err(e) => {
            let message = match e.trial_ref() {
                Some(_) => e.with_ref(),
                None => format!("An unexpected error occurred when checking {}. {}!", dir, e),
            };
            log.error(&message).await;
            log.error(&format!(
                "Issues were found with {}. Record the issue and refer to the Trial Instructions.",
                dir
            ))
            .await;
            CheckRecord::issue(Category::DataDir, dir, e.with_ref())
        }
    }
}

async fn report_fresh(log: &mut StatusLog, dir: &str, fresh: &FreshFile) -> Result<CheckRecord> {
    let preview = preview_file(&fresh.path, PREVIEW_LINES, Some(PREVIEW_MAX_CHARS)).await?;
    let detail = format!("{} ({}s old)", fresh.file_name(), fresh.age.as_secs());

    match preview {
        Preview::Text(text) => {
            log.ok(&format!(
                "No issues found with {}. Here is the latest data, please check if sensible data is being logged.\nRefer to Trial Instructions (Annex A) for examples:",
                dir
            ))
            .await;
            log.info(&format!("Latest file: {}\n{}\n", detail, text)).await;
        }
        Preview::NonText => {
            log.ok(&format!(
                "No issues found with {}. No preview displayed as data is non text",
                dir
            ))
            .await;
        }
    }

    Ok(CheckRecord::healthy(Category::DataDir, dir, detail))
}
