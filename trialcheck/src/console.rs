//! Operator status log
//!
//! Every message is written to the console with ANSI colour coding and
//! appended, without colour, to a flat text log. The log file is only ever
//! appended to.

use chrono::{DateTime, Local, SecondsFormat};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress messages and data previews
    Info,
    /// Healthy outcome, shown in green
    Ok,
    /// Recovered problem, shown in yellow
    Warn,
    /// Problem the operator must record, shown in red
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Render a message for the console.
pub fn render_console(level: Level, message: &str) -> String {
    match level {
        Level::Info => message.to_string(),
        Level::Ok => message.white().bold().on_green().to_string(),
        Level::Warn => format!("{} {}", "WARNING:".white().bold().on_yellow(), message),
        Level::Error => format!(
            "{} {}",
            "ERROR DETECTED!".white().bold().on_red(),
            message
        ),
    }
}

/// Render one log file entry.
///
/// The first line carries the timestamp and level; continuation lines of a
/// multi-line message are indented with a tab so each entry starts at
/// column zero.
pub fn render_entry(level: Level, message: &str, at: DateTime<Local>) -> String {
    let mut lines = message.trim_end_matches('\n').split('\n');
    let first = lines.next().unwrap_or_default();

    let mut entry = format!(
        "{} - {} {}\n",
        at.to_rfc3339_opts(SecondsFormat::Millis, false),
        level.tag(),
        first.trim_end_matches('\r')
    );
    for line in lines {
        entry.push('\t');
        entry.push_str(line.trim_end_matches('\r'));
        entry.push('\n');
    }
    entry
}

/// Console + append-only file logger used by every check.
pub struct StatusLog {
    path: PathBuf,
    console: Box<dyn Write + Send>,
}

impl StatusLog {
    /// Log to stdout and append to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_console(path, Box::new(std::io::stdout()))
    }

    /// Log to a custom console writer and append to `path`.
    pub fn with_console(path: impl Into<PathBuf>, console: Box<dyn Write + Send>) -> Self {
        Self {
            path: path.into(),
            console,
        }
    }

    /// Write one message to the console and append it to the log file.
    ///
    /// A failure to append is reported on the console and otherwise ignored.
    pub async fn log(&mut self, level: Level, message: &str) {
        let rendered = render_console(level, message);
        if let Err(e) = writeln!(self.console, "{}", rendered).and_then(|_| self.console.flush()) {
            warn!("Failed to write to console: {}", e);
        }

        let entry = render_entry(level, message, Local::now());
        if let Err(e) = self.append(&entry).await {
            warn!("Failed to append to {}: {}", self.path.display(), e);
            let notice = format!(
                "An unexpected error occurred while writing the status log {}: {}",
                self.path.display(),
                e
            );
            let _ = writeln!(self.console, "{}", render_console(Level::Warn, &notice));
        }
    }

    async fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    pub async fn info(&mut self, message: &str) {
        self.log(Level::Info, message).await
    }

    /// Green "no issues" message
    pub async fn ok(&mut self, message: &str) {
        self.log(Level::Ok, message).await
    }

    pub async fn warn(&mut self, message: &str) {
        self.log(Level::Warn, message).await
    }

    pub async fn error(&mut self, message: &str) {
        self.log(Level::Error, message).await
    }
}
