//! Persistent record of normalization runs.
//!
//! Each run that plans at least one rename appends a header line and one line
//! per rename to a text file in the processed directory. The file is never
//! truncated.

use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp format used in run headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while writing the run log.
#[derive(Debug)]
pub enum LogError {
    /// Opening or writing the log file failed.
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LogError {}

/// The log record of a single run.
#[derive(Debug, Clone)]
pub struct RunLog {
    /// Local time the run started, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// One `"{old}  -->  {new}"` line per planned rename.
    pub lines: Vec<String>,
}

impl RunLog {
    /// Creates a log record stamped with the current local time.
    pub fn new(lines: Vec<String>) -> Self {
        Self::at(Local::now().naive_local(), lines)
    }

    /// Creates a log record stamped with `time`.
    pub fn at(time: NaiveDateTime, lines: Vec<String>) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            lines,
        }
    }

    pub fn header(&self) -> String {
        format!("=== Normalization run on {} ===", self.timestamp)
    }

    /// The exact text appended to the log file.
    pub fn render(&self) -> String {
        let mut text = format!("\n{}\n", self.header());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Appends this record to `dir/file_name`.
    ///
    /// Returns `Ok(false)` without touching the filesystem when there are no
    /// lines to record.
    pub fn append(&self, dir: &Path, file_name: &str) -> Result<bool, LogError> {
        if self.lines.is_empty() {
            return Ok(false);
        }

        let path = dir.join(file_name);
        let write_failed = |source| LogError::WriteFailed {
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_failed)?;
        file.write_all(self.render().as_bytes())
            .map_err(write_failed)?;

        Ok(true)
    }
}
