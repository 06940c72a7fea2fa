//! Error types for the runtime boundary and replay scripts.

use sandcon_core::RuntimeCommand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("sandbox runtime unavailable: {0}")]
    Unavailable(String),

    #[error("sandbox runtime rejected {command:?}: {reason}")]
    Rejected {
        command: RuntimeCommand,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to parse script line {line_num}: {source}")]
    Parse {
        line_num: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("script io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The console event loop is gone; its queue no longer accepts events.
#[derive(Debug, Error)]
#[error("console event loop stopped")]
pub struct LoopStopped;
