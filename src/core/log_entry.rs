//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded log line. Created once per log call and never mutated;
/// copied by value into the owning buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Full hierarchical path of the logger at the time of logging.
    pub logger_path: String,
    pub message: String,
    pub file: Option<String>,
    pub member: Option<String>,
    pub line: Option<u32>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a crafted message cannot forge extra lines in extracted text.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger_path: impl Into<String>, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger_path: logger_path.into(),
            message: Self::sanitize_message(&message),
            file: None,
            member: None,
            line: None,
        }
    }

    pub fn with_source(mut self, file: &str, member: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.member = Some(member.to_string());
        self.line = Some(line);
        self
    }

    /// Render this entry as a single extraction line:
    /// `[HH:MM:SS.mmm] [path] [LVL] message`, with ` (file:line)` appended
    /// when source info was captured.
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.logger_path,
            self.level.to_str(),
            self.message
        );
        if let (Some(file), Some(line_no)) = (&self.file, self.line) {
            line.push_str(&format!(" ({}:{})", file, line_no));
        }
        line
    }
}
