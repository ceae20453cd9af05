use chrono::{DateTime, Local};
use std::panic::Location;
use std::path::Path;

use crate::logging::level::Level;

/// A single log event, captured at the call site.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub name: String,
    pub level: Level,
    pub message: String,
    pub pathname: String,
    pub lineno: u32,
    pub module: String,
    pub created: DateTime<Local>,
    pub process: u32,
}

impl LogRecord {
    pub fn new(name: &str, level: Level, message: impl Into<String>, pathname: &str, lineno: u32) -> Self {
        Self {
            name: name.to_string(),
            level,
            message: message.into(),
            pathname: pathname.to_string(),
            lineno,
            module: module_from_path(pathname),
            created: Local::now(),
            process: std::process::id(),
        }
    }

    /// Record pointing at the given source location.
    pub fn at(name: &str, level: Level, message: impl Into<String>, location: &Location<'_>) -> Self {
        Self::new(name, level, message, location.file(), location.line())
    }

    /// Base name of `pathname`.
    pub fn filename(&self) -> &str {
        Path::new(&self.pathname)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.pathname)
    }
}

/// Module name of a source path: its file stem.
pub fn module_from_path(pathname: &str) -> String {
    Path::new(pathname)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}
