//! sandcon-core: console log aggregation and view state for a sandbox
//! preview embed.
//! Pure state machines with no IO or async dependencies; the runtime crate
//! drives them from an event queue.

pub mod aggregate;
pub mod controller;
pub mod error;
pub mod format;
pub mod snapshot;
pub mod types;
pub mod value;
pub mod view_state;

pub use aggregate::{ConsoleAggregator, PushOutcome, aggregate, coalesce, filter_empty};
pub use controller::{ConsoleController, ConsoleOptions, LogDisposition, RuntimeCommand};
pub use error::ViewError;
pub use format::{format_entry, format_value};
pub use snapshot::{ConsoleRow, ConsoleSnapshot};
pub use types::{ClientId, DisplayEntry, LogEntry, LogMethod, SandboxStatus, Severity};
pub use value::LogValue;
pub use view_state::{FileSet, ViewState};
