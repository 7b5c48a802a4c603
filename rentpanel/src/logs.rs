//! Leveled progress logging for the pipeline and CLI.
//!
//! Entries go to stderr so that stdout stays free for panel output. The
//! transform itself never logs.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for sub-steps
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Human-readable line, e.g. `"   ✓ Read 12 rows"`.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global logger
pub static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// Writes log entries to stderr, as text or JSON lines.
pub struct Logger {
    quiet: AtomicBool,
    json: AtomicBool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            quiet: AtomicBool::new(false),
            json: AtomicBool::new(false),
        }
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    pub fn set_json(&self, json: bool) {
        self.json.store(json, Ordering::Relaxed);
    }

    pub fn log(&self, entry: LogEntry) {
        if self.quiet.load(Ordering::Relaxed) {
            return;
        }
        if self.json.load(Ordering::Relaxed) {
            if let Ok(line) = serde_json::to_string(&entry) {
                eprintln!("{}", line);
            }
        } else {
            eprintln!("{}", entry.render());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOGGER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOGGER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOGGER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOGGER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOGGER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_levels() {
        assert_eq!(LogEntry::info("Reading").render(), "    Reading");
        assert_eq!(LogEntry::success("Done").render(), "   ✓ Done");
        assert!(LogEntry::warning("careful").render().contains("careful"));
    }

    #[test]
    fn test_render_indent() {
        let line = LogEntry::info("nested").with_indent(1).render();
        assert!(line.starts_with("      "));
        assert!(line.ends_with("nested"));
    }

    #[test]
    fn test_entry_json_shape() {
        let json = serde_json::to_value(LogEntry::error("boom").with_indent(2)).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
        assert_eq!(json["indent"], 2);
    }
}
