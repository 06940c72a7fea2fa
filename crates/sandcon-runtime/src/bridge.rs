//! SandboxRuntime trait: the controller's only way to ask the embedded
//! execution runtime to act. Requests are fire-and-forget; the runtime
//! answers later through status, client and log events.

use std::sync::{Mutex, PoisonError};

use sandcon_core::RuntimeCommand;

use crate::error::RuntimeError;

/// Trait for requesting runs and restarts. Enables mock injection for testing.
pub trait SandboxRuntime: Send + Sync {
    fn request(&self, command: RuntimeCommand) -> Result<(), RuntimeError>;
}

impl<T: SandboxRuntime + ?Sized> SandboxRuntime for &T {
    fn request(&self, command: RuntimeCommand) -> Result<(), RuntimeError> {
        (**self).request(command)
    }
}

/// Runtime stand-in that records every request it receives.
///
/// Used by `sandcon replay`, where the script itself plays the part of the
/// runtime's replies.
#[derive(Debug, Default)]
pub struct RecordingRuntime {
    requests: Mutex<Vec<RuntimeCommand>>,
    unavailable: Option<String>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails as if the runtime had gone away.
    #[must_use]
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    pub fn requests(&self) -> Vec<RuntimeCommand> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SandboxRuntime for RecordingRuntime {
    fn request(&self, command: RuntimeCommand) -> Result<(), RuntimeError> {
        if let Some(ref reason) = self.unavailable {
            return Err(RuntimeError::Unavailable(reason.clone()));
        }
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
        tracing::debug!(?command, "runtime request recorded");
        Ok(())
    }
}
