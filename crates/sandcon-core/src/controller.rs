//! Console controller: the aggregator plus view state, kept in sync.
//!
//! Every method is one state transition. Transitions that need the sandbox
//! runtime to act return a [`RuntimeCommand`]; dispatching it is the
//! caller's job and is fire-and-forget. The runtime reports back through
//! [`ConsoleController::on_status`], [`ConsoleController::on_client`] and
//! [`ConsoleController::on_log`].

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{ConsoleAggregator, PushOutcome};
use crate::error::ViewError;
use crate::snapshot::ConsoleSnapshot;
use crate::types::{ClientId, DisplayEntry, LogEntry, SandboxStatus};
use crate::view_state::{FileSet, ViewState};

/// Retired client ids remembered for stale-log rejection; oldest evicted first.
pub const RETIRED_CLIENT_LIMIT: usize = 16;

/// Request sent to the sandbox runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeCommand {
    Run,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleOptions {
    /// Whether the console panel exists at all.
    pub show_console: bool,
    /// Whether the sandbox starts on its own; when false a run prompt is shown.
    pub autorun: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            show_console: false,
            autorun: true,
        }
    }
}

/// What happened to a log arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDisposition {
    Accepted(PushOutcome),
    /// Entry came from a client retired by a refresh or restart.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ConsoleController {
    options: ConsoleOptions,
    files: FileSet,
    view: ViewState,
    logs: ConsoleAggregator,
    client: Option<ClientId>,
    retired: VecDeque<ClientId>,
}

impl ConsoleController {
    pub fn new(options: ConsoleOptions, files: FileSet) -> Self {
        let view = ViewState::new(&files);
        Self {
            options,
            files,
            view,
            logs: ConsoleAggregator::new(),
            client: None,
            retired: VecDeque::new(),
        }
    }

    // ── UI actions ──────────────────────────────────────────────────

    /// Flip panel visibility. Returns false when the console is disabled.
    pub fn toggle_panel(&mut self) -> bool {
        if !self.options.show_console {
            return false;
        }
        self.view.toggle_panel();
        true
    }

    pub fn select_file(&mut self, path: &str) -> Result<(), ViewError> {
        self.view.select_file(&self.files, path)
    }

    /// Start the sandbox unless it is already running.
    pub fn run(&mut self) -> Option<RuntimeCommand> {
        if self.view.status == SandboxStatus::Running {
            return None;
        }
        self.view.status = SandboxStatus::Running;
        Some(RuntimeCommand::Run)
    }

    /// Restart the preview. Allowed from any status.
    pub fn refresh(&mut self) -> RuntimeCommand {
        self.reset_logs();
        self.view.status = SandboxStatus::Idle;
        if let Some(client) = self.client.take() {
            self.retire(client);
        }
        RuntimeCommand::Refresh
    }

    pub fn reset_logs(&mut self) {
        self.logs.reset();
    }

    // ── Runtime reports ─────────────────────────────────────────────

    pub fn on_status(&mut self, status: SandboxStatus) {
        self.view.status = status;
    }

    /// A request could not be delivered to the runtime.
    pub fn on_runtime_failure(&mut self) {
        self.view.status = SandboxStatus::Error;
    }

    pub fn on_files(&mut self, files: FileSet, active: Option<&str>) {
        self.files = files;
        // an unknown hint falls through to retain_active
        if let Some(path) = active.filter(|path| self.files.contains(path)) {
            self.view.active_file = Some(path.to_string());
        }
        self.view.retain_active(&self.files);
    }

    /// A preview client attached. A different client means the preview
    /// restarted, so the previous run's logs are dropped. Returns true
    /// when that happened.
    pub fn on_client(&mut self, client: ClientId) -> bool {
        if self.client.as_ref() == Some(&client) {
            return false;
        }
        self.retired.retain(|id| *id != client);
        let restarted = match self.client.replace(client) {
            Some(previous) => {
                self.retire(previous);
                true
            }
            None => false,
        };
        if restarted {
            self.reset_logs();
        }
        restarted
    }

    pub fn on_log(
        &mut self,
        client: &ClientId,
        entry: impl Into<Arc<LogEntry>>,
    ) -> LogDisposition {
        let accepted = match &self.client {
            Some(current) => current == client,
            None => !self.retired.contains(client),
        };
        if !accepted {
            return LogDisposition::Stale;
        }
        if self.client.is_none() {
            self.client = Some(client.clone());
        }
        LogDisposition::Accepted(self.logs.push(entry))
    }

    fn retire(&mut self, client: ClientId) {
        self.retired.retain(|id| *id != client);
        if self.retired.len() == RETIRED_CLIENT_LIMIT {
            self.retired.pop_front();
        }
        self.retired.push_back(client);
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn options(&self) -> ConsoleOptions {
        self.options
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> SandboxStatus {
        self.view.status
    }

    pub fn client(&self) -> Option<&ClientId> {
        self.client.as_ref()
    }

    pub fn display(&self) -> &[DisplayEntry] {
        self.logs.display()
    }

    pub fn aggregator(&self) -> &ConsoleAggregator {
        &self.logs
    }

    /// Number of display rows, not raw entries.
    pub fn logs_count(&self) -> usize {
        self.logs.logs_count()
    }

    pub fn empty_logs(&self) -> bool {
        self.logs_count() == 0
    }

    pub fn run_prompt_visible(&self) -> bool {
        !self.options.autorun && self.view.status != SandboxStatus::Running
    }

    pub fn controls_visible(&self) -> bool {
        self.view.status == SandboxStatus::Running
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ConsoleSnapshot {
        ConsoleSnapshot::capture(self, now)
    }
}
