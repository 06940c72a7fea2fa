//! Error types for view-state transitions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown file: {0}")]
    UnknownFile(String),
}
