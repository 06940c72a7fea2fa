//! sandcon-runtime: drives the console controller from an ordered event
//! queue and bridges its requests to the sandbox runtime.

pub mod bridge;
pub mod cli;
pub mod display;
pub mod error;
pub mod event_loop;
pub mod replay;
pub mod script;

pub use bridge::{RecordingRuntime, SandboxRuntime};
pub use error::{LoopStopped, RuntimeError, ScriptError};
pub use event_loop::{ConsoleEvent, ConsoleHandle, ConsoleLoop, ConsoleNotification, spawn};
