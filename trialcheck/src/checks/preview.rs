//! Tail previews of data files

use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Bytes read from the end of a file when building a preview
const TAIL_WINDOW: u64 = 64 * 1024;

/// What can be shown of a data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Trailing text of the file
    Text(String),
    /// Binary or database file, nothing to show
    NonText,
}

/// Last `n` lines of `text`, joined with `\n`.
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Last `max` characters of `text`.
pub fn tail_chars(text: &str, max: usize) -> &str {
    if max == 0 {
        return "";
    }
    match text.char_indices().rev().nth(max - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

fn is_database(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("db"))
}

/// Decide whether `bytes` read from `path` can be previewed.
///
/// Database files and content with NUL bytes are binary. Anything else is
/// shown, with stray invalid bytes (serial line noise) replaced by U+FFFD.
pub fn classify(path: &Path, bytes: Vec<u8>) -> Preview {
    if is_database(path) || bytes.contains(&0) {
        return Preview::NonText;
    }
    match String::from_utf8(bytes) {
        Ok(text) => Preview::Text(text),
        Err(e) => Preview::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// Read the end of a file.
///
/// When the file is larger than the tail window the partial first line is
/// dropped so the result starts on a line boundary.
pub async fn read_tail(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    let len = file.metadata().await?.len();

    let truncated = len > TAIL_WINDOW;
    if truncated {
        file.seek(SeekFrom::Start(len - TAIL_WINDOW)).await?;
    }

    let mut buf = Vec::with_capacity(len.min(TAIL_WINDOW) as usize);
    file.read_to_end(&mut buf).await?;

    if truncated {
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            buf.drain(..=pos);
        }
    }
    Ok(buf)
}

/// Build a preview of the last `lines` lines, optionally capped to
/// `max_chars` characters.
pub async fn preview_file(
    path: &Path,
    lines: usize,
    max_chars: Option<usize>,
) -> std::io::Result<Preview> {
    if is_database(path) {
        return Ok(Preview::NonText);
    }

    let preview = match classify(path, read_tail(path).await?) {
        Preview::Text(text) => {
            let tail = tail_lines(&text, lines);
            let tail = match max_chars {
                Some(max) => tail_chars(&tail, max).to_string(),
                None => tail,
            };
            Preview::Text(tail)
        }
        Preview::NonText => Preview::NonText,
    };
    Ok(preview)
}
