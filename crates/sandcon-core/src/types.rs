use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::value::LogValue;

// ─── Log Method ───────────────────────────────────────────────────

/// Console method that produced a log entry.
///
/// Unknown method names are kept verbatim so two entries from an
/// unrecognised method still compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogMethod {
    Log,
    Debug,
    Info,
    Warn,
    Error,
    Table,
    Clear,
    Time,
    TimeEnd,
    Count,
    Assert,
    Other(String),
}

impl LogMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Log => "log",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Table => "table",
            Self::Clear => "clear",
            Self::Time => "time",
            Self::TimeEnd => "timeEnd",
            Self::Count => "count",
            Self::Assert => "assert",
            Self::Other(name) => name,
        }
    }

    /// Accent used when rendering a row: only `error` is highlighted.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Error => Severity::Error,
            _ => Severity::Note,
        }
    }
}

impl From<&str> for LogMethod {
    fn from(s: &str) -> Self {
        match s {
            "log" => Self::Log,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "table" => Self::Table,
            "clear" => Self::Clear,
            "time" => Self::Time,
            "timeEnd" => Self::TimeEnd,
            "count" => Self::Count,
            "assert" => Self::Assert,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LogMethod {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<LogMethod> for String {
    fn from(method: LogMethod) -> Self {
        match method {
            LogMethod::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Note,
}

// ─── Sandbox Status ───────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxStatus {
    #[default]
    Idle,
    Running,
    Error,
}

impl SandboxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SandboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Client Identity ──────────────────────────────────────────────

/// Opaque identifier of one preview client. A new client means the
/// preview restarted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Entries ──────────────────────────────────────────────────────

/// One raw console message, immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub method: LogMethod,
    #[serde(default)]
    pub data: Vec<LogValue>,
}

impl LogEntry {
    pub fn new(id: impl Into<String>, method: LogMethod, data: Vec<LogValue>) -> Self {
        Self {
            id: id.into(),
            method,
            data,
        }
    }
}

/// A run of identical consecutive entries, represented by the newest one.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub source: Arc<LogEntry>,
    pub count: u32,
}

impl DisplayEntry {
    pub fn single(source: Arc<LogEntry>) -> Self {
        Self { source, count: 1 }
    }
}
