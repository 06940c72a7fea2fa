//! JSON-lines replay scripts: one event per line, blank lines and `#`
//! comments skipped.
//!
//! ```text
//! {"type":"client","client":"c1"}
//! {"type":"log","client":"c1","id":"1","method":"log","data":["hello"]}
//! {"type":"status","status":"running"}
//! {"type":"refresh"}
//! ```

use std::io::BufRead;
use std::path::Path;

use sandcon_core::{ClientId, FileSet, LogEntry, LogMethod, LogValue, SandboxStatus};
use serde::Deserialize;

use crate::error::ScriptError;
use crate::event_loop::ConsoleEvent;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Log {
        client: ClientId,
        id: String,
        method: LogMethod,
        #[serde(default)]
        data: Vec<LogValue>,
    },
    Status {
        status: SandboxStatus,
    },
    Files {
        files: Vec<String>,
        #[serde(default)]
        active: Option<String>,
    },
    Client {
        client: ClientId,
    },
    Toggle,
    Select {
        path: String,
    },
    Run,
    Refresh,
    Clear,
}

impl From<ScriptEvent> for ConsoleEvent {
    fn from(event: ScriptEvent) -> Self {
        match event {
            ScriptEvent::Log {
                client,
                id,
                method,
                data,
            } => ConsoleEvent::LogReceived {
                client,
                entry: LogEntry::new(id, method, data),
            },
            ScriptEvent::Status { status } => ConsoleEvent::StatusChanged(status),
            ScriptEvent::Files { files, active } => ConsoleEvent::FilesChanged {
                files: FileSet::new(files),
                active,
            },
            ScriptEvent::Client { client } => ConsoleEvent::ClientAttached(client),
            ScriptEvent::Toggle => ConsoleEvent::TogglePanel,
            ScriptEvent::Select { path } => ConsoleEvent::SelectFile(path),
            ScriptEvent::Run => ConsoleEvent::Run,
            ScriptEvent::Refresh => ConsoleEvent::Refresh,
            ScriptEvent::Clear => ConsoleEvent::ResetLogs,
        }
    }
}

pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed).map_err(|source| ScriptError::Parse {
            line_num: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Load a script from a file, or from stdin when `path` is `-`.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, ScriptError> {
    if path.as_os_str() == "-" {
        return parse_script(std::io::stdin().lock());
    }
    let file = std::fs::File::open(path)?;
    parse_script(std::io::BufReader::new(file))
}
