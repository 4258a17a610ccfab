//! Backup freshness check
//!
//! Lists the backup directory (usually the root of a USB drive), parses the
//! timestamp at the end of each entry name and flags the run if the newest
//! backup is more than 24 hours old.

use chrono::{DateTime, Duration, TimeZone};
use std::path::Path;
use tokio::fs;
use tracing::debug;
use trialcheck_core::{freshest_backup, BackupAge, Result, TrialCheckError, BACKUP_MAX_AGE_HOURS};

use super::{Category, CheckRecord};
use crate::console::StatusLog;

/// Names of every entry in the backup directory.
pub async fn list_entries(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| {
        debug!("read_dir {} failed: {}", dir.display(), e);
        TrialCheckError::BackupMediaMissing {
            path: dir.to_path_buf(),
        }
    })?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Whether a backup of this age is too old.
pub fn is_stale(age: Duration) -> bool {
    age > Duration::hours(BACKUP_MAX_AGE_HOURS)
}

/// Find the freshest backup in `dir` and require it to be recent.
///
/// Backup names are stamped in `now`'s time zone, normally the local one.
pub async fn inspect_backups<Tz: TimeZone>(dir: &Path, now: &DateTime<Tz>) -> Result<BackupAge> {
    let names = list_entries(dir).await?;
    debug!("{} entries in {}", names.len(), dir.display());

    match freshest_backup(&names, now) {
        Some(latest) if !is_stale(latest.age) => Ok(latest),
        Some(latest) => {
            debug!("Latest backup {} is {:?} old", latest.name, latest.age);
            Err(TrialCheckError::StaleBackup)
        }
        None => {
            debug!("No timestamped backups in {}", dir.display());
            Err(TrialCheckError::StaleBackup)
        }
    }
}

fn format_age(age: Duration) -> String {
    let hours = age.num_hours();
    let minutes = age.num_minutes() - hours * 60;
    format!("{}h {:02}m", hours, minutes)
}

/// Check the backup directory and report the outcome.
pub async fn check_backups<Tz: TimeZone>(
    log: &mut StatusLog,
    dir: &Path,
    now: &DateTime<Tz>,
) -> CheckRecord {
    let subject = dir.display().to_string();
    log.info(&format!("Checking if backups exist in {}", subject))
        .await;

    match inspect_backups(dir, now).await {
        Ok(latest) => {
            let detail = format!("{} ({} old)", latest.name, format_age(latest.age));
            log.info(&format!("Latest backup: {}", detail)).await;
            log.ok("No issues found... Backups working normally.").await;
            CheckRecord::healthy(Category::Backup, subject, detail)
        }
        Err(e) => {
            log.error(&e.with_ref()).await;
            log.error("Issues were found. Record the issue and refer to the Trial Instructions.")
                .await;
            CheckRecord::issue(Category::Backup, subject, e.with_ref())
        }
    }
}
