//! Console event loop: a single task drains an ordered queue of runtime
//! reports and UI actions and applies each to the controller in arrival
//! order. Row-level changes are broadcast to subscribers; full snapshots
//! are served on request.

use std::sync::Arc;

use chrono::Utc;
use sandcon_core::{
    ClientId, ConsoleController, ConsoleRow, ConsoleSnapshot, FileSet, LogDisposition, LogEntry,
    PushOutcome, RuntimeCommand, SandboxStatus, ViewState,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::bridge::SandboxRuntime;
use crate::error::LoopStopped;

/// Bound on queued events before senders wait.
pub const EVENT_QUEUE_CAPACITY: usize = 256;
const NOTIFY_CAPACITY: usize = 256;

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum ConsoleEvent {
    // from the sandbox runtime
    LogReceived { client: ClientId, entry: LogEntry },
    StatusChanged(SandboxStatus),
    FilesChanged { files: FileSet, active: Option<String> },
    ClientAttached(ClientId),
    // from the UI
    TogglePanel,
    SelectFile(String),
    Run,
    Refresh,
    ResetLogs,
    Snapshot(oneshot::Sender<ConsoleSnapshot>),
}

/// Change notification sent to subscribers after each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ConsoleNotification {
    /// A new row was added at the end.
    RowAppended { row: ConsoleRow },
    /// The last row was replaced with a higher count.
    RowCoalesced { row: ConsoleRow },
    LogsReset,
    ViewChanged { view: ViewState },
}

pub struct ConsoleLoop {
    controller: ConsoleController,
    runtime: Arc<dyn SandboxRuntime>,
    /// Receives events from the runtime and the UI.
    event_rx: mpsc::Receiver<ConsoleEvent>,
    /// Broadcasts changes to all subscribers.
    notify_tx: broadcast::Sender<ConsoleNotification>,
    /// Cancellation token for graceful shutdown.
    cancel: CancellationToken,
}

impl ConsoleLoop {
    pub fn new(
        controller: ConsoleController,
        runtime: Arc<dyn SandboxRuntime>,
        event_rx: mpsc::Receiver<ConsoleEvent>,
        notify_tx: broadcast::Sender<ConsoleNotification>,
    ) -> Self {
        Self::with_cancel(
            controller,
            runtime,
            event_rx,
            notify_tx,
            CancellationToken::new(),
        )
    }

    pub fn with_cancel(
        controller: ConsoleController,
        runtime: Arc<dyn SandboxRuntime>,
        event_rx: mpsc::Receiver<ConsoleEvent>,
        notify_tx: broadcast::Sender<ConsoleNotification>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            controller,
            runtime,
            event_rx,
            notify_tx,
            cancel,
        }
    }

    /// Main event loop. Runs until every handle is dropped or the
    /// cancellation token fires, then hands back the final controller.
    pub async fn run(mut self) -> ConsoleController {
        info!("console loop: started");
        loop {
            tokio::select! {
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("console loop: event channel closed, shutting down");
                            break;
                        }
                    }
                }
                _ = self.cancel.cancelled() => {
                    info!("console loop: cancellation requested, shutting down");
                    break;
                }
            }
        }
        self.controller
    }

    fn handle_event(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::LogReceived { client, entry } => self.handle_log(&client, entry),
            ConsoleEvent::StatusChanged(status) => {
                if status == SandboxStatus::Error {
                    warn!("sandbox reported an execution error");
                } else {
                    debug!(%status, "sandbox status changed");
                }
                self.controller.on_status(status);
                self.notify_view();
            }
            ConsoleEvent::FilesChanged { files, active } => {
                debug!(count = files.len(), "visible files changed");
                self.controller.on_files(files, active.as_deref());
                self.notify_view();
            }
            ConsoleEvent::ClientAttached(client) => {
                debug!(%client, "preview client attached");
                if self.controller.on_client(client) {
                    debug!("preview restarted, previous logs dropped");
                    self.notify(ConsoleNotification::LogsReset);
                }
            }
            ConsoleEvent::TogglePanel => {
                if self.controller.toggle_panel() {
                    self.notify_view();
                } else {
                    debug!("toggle ignored: console disabled");
                }
            }
            ConsoleEvent::SelectFile(path) => match self.controller.select_file(&path) {
                Ok(()) => self.notify_view(),
                Err(e) => warn!("ignoring file selection: {e}"),
            },
            ConsoleEvent::Run => match self.controller.run() {
                Some(command) => {
                    self.dispatch(command);
                    self.notify_view();
                }
                None => debug!("run ignored: sandbox already running"),
            },
            ConsoleEvent::Refresh => {
                let command = self.controller.refresh();
                self.notify(ConsoleNotification::LogsReset);
                self.dispatch(command);
                self.notify_view();
            }
            ConsoleEvent::ResetLogs => {
                self.controller.reset_logs();
                self.notify(ConsoleNotification::LogsReset);
            }
            ConsoleEvent::Snapshot(reply) => {
                // requester may have given up
                let _ = reply.send(self.controller.snapshot(Utc::now()));
            }
        }
    }

    fn handle_log(&mut self, client: &ClientId, entry: LogEntry) {
        let id = entry.id.clone();
        match self.controller.on_log(client, entry) {
            LogDisposition::Stale => {
                debug!(%client, id = %id, "dropping log from superseded client");
            }
            LogDisposition::Accepted(PushOutcome::Dropped) => {
                trace!(id = %id, "dropping empty log");
            }
            LogDisposition::Accepted(outcome) => {
                let Some(last) = self.controller.display().last() else {
                    return;
                };
                let row = ConsoleRow::from(last);
                if outcome == PushOutcome::Coalesced {
                    self.notify(ConsoleNotification::RowCoalesced { row });
                } else {
                    self.notify(ConsoleNotification::RowAppended { row });
                }
            }
        }
    }

    /// Fire-and-forget request; a failed delivery surfaces as an error status.
    fn dispatch(&mut self, command: RuntimeCommand) {
        if let Err(e) = self.runtime.request(command) {
            warn!(?command, "runtime request failed: {e}");
            self.controller.on_runtime_failure();
        }
    }

    fn notify_view(&self) {
        self.notify(ConsoleNotification::ViewChanged {
            view: self.controller.view().clone(),
        });
    }

    fn notify(&self, notification: ConsoleNotification) {
        // no subscribers is fine
        let _ = self.notify_tx.send(notification);
    }
}

/// Cloneable sender side of the console loop.
#[derive(Clone)]
pub struct ConsoleHandle {
    event_tx: mpsc::Sender<ConsoleEvent>,
    notify_tx: broadcast::Sender<ConsoleNotification>,
}

impl ConsoleHandle {
    pub async fn send(&self, event: ConsoleEvent) -> Result<(), LoopStopped> {
        self.event_tx.send(event).await.map_err(|_| LoopStopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleNotification> {
        self.notify_tx.subscribe()
    }

    /// Full read model, taken after every event queued before this call.
    pub async fn snapshot(&self) -> Result<ConsoleSnapshot, LoopStopped> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ConsoleEvent::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| LoopStopped)
    }

    pub async fn log(&self, client: ClientId, entry: LogEntry) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::LogReceived { client, entry }).await
    }

    pub async fn status(&self, status: SandboxStatus) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::StatusChanged(status)).await
    }

    pub async fn toggle_panel(&self) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::TogglePanel).await
    }

    pub async fn select_file(&self, path: impl Into<String>) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::SelectFile(path.into())).await
    }

    pub async fn run(&self) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::Run).await
    }

    pub async fn refresh(&self) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::Refresh).await
    }

    pub async fn reset_logs(&self) -> Result<(), LoopStopped> {
        self.send(ConsoleEvent::ResetLogs).await
    }
}

/// Spawn the console loop on the current tokio runtime.
pub fn spawn(
    controller: ConsoleController,
    runtime: Arc<dyn SandboxRuntime>,
    cancel: CancellationToken,
) -> (ConsoleHandle, JoinHandle<ConsoleController>) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let (notify_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
    let console = ConsoleLoop::with_cancel(controller, runtime, event_rx, notify_tx.clone(), cancel);
    let task = tokio::spawn(console.run());
    (ConsoleHandle { event_tx, notify_tx }, task)
}
