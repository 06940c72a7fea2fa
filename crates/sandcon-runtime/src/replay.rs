//! `sandcon replay`: feed a script through the console loop and render
//! the final panel.

use std::sync::Arc;

use sandcon_core::{ConsoleController, ConsoleOptions, ConsoleSnapshot, FileSet, RuntimeCommand};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bridge::{RecordingRuntime, SandboxRuntime};
use crate::cli::ReplayOpts;
use crate::display::render_panel;
use crate::event_loop::{self, ConsoleNotification};
use crate::script::{ScriptEvent, load_script};

/// Result of replaying one script.
pub struct ReplayOutcome {
    pub snapshot: ConsoleSnapshot,
    /// Requests the controller sent to the runtime, in order.
    pub requests: Vec<RuntimeCommand>,
}

pub async fn cmd_replay(opts: &ReplayOpts) -> anyhow::Result<String> {
    let events = load_script(&opts.script)?;
    tracing::debug!(count = events.len(), "script loaded");

    let options = ConsoleOptions {
        show_console: opts.show_console,
        autorun: opts.autorun,
    };
    let files = FileSet::new(opts.files.iter().cloned());
    let mut controller = ConsoleController::new(options, files);
    if opts.open {
        controller.toggle_panel();
    }

    let outcome = replay(controller, events, opts.follow).await?;
    tracing::info!(requests = ?outcome.requests, "replay finished");

    if opts.json {
        let mut out = serde_json::to_string_pretty(&outcome.snapshot)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render_panel(&outcome.snapshot))
    }
}

/// Replay `events` in order and return the final state. With `follow`,
/// every change notification is printed as a JSON line as it happens.
pub async fn replay(
    controller: ConsoleController,
    events: Vec<ScriptEvent>,
    follow: bool,
) -> anyhow::Result<ReplayOutcome> {
    let runtime = Arc::new(RecordingRuntime::new());
    let (handle, task) = event_loop::spawn(
        controller,
        Arc::clone(&runtime) as Arc<dyn SandboxRuntime>,
        CancellationToken::new(),
    );

    let printer = follow.then(|| tokio::spawn(print_notifications(handle.subscribe())));

    for event in events {
        handle.send(event.into()).await?;
    }
    let snapshot = handle.snapshot().await?;

    drop(handle);
    task.await?;
    if let Some(printer) = printer {
        printer.await?;
    }

    Ok(ReplayOutcome {
        snapshot,
        requests: runtime.requests(),
    })
}

async fn print_notifications(mut rx: broadcast::Receiver<ConsoleNotification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => match serde_json::to_string(&notification) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("cannot serialize notification: {e}"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use sandcon_core::SandboxStatus;

    fn controller(autorun: bool) -> ConsoleController {
        let mut ctl = ConsoleController::new(
            ConsoleOptions {
                show_console: true,
                autorun,
            },
            FileSet::new(["/App.js", "/index.js"]),
        );
        ctl.toggle_panel();
        ctl
    }

    fn events(script: &str) -> Vec<ScriptEvent> {
        parse_script(script.as_bytes()).expect("parse")
    }

    #[tokio::test]
    async fn replay_coalesces_and_counts_rows() {
        let script = r#"
{"type":"client","client":"c1"}
{"type":"status","status":"running"}
{"type":"log","client":"c1","id":"1","method":"log","data":["a"]}
{"type":"log","client":"c1","id":"2","method":"log","data":["a"]}
{"type":"log","client":"c1","id":"3","method":"log","data":[""]}
{"type":"log","client":"c1","id":"4","method":"log","data":["b"]}
{"type":"log","client":"c1","id":"5","method":"log","data":["a"]}
"#;
        let outcome = replay(controller(true), events(script), false)
            .await
            .expect("replay");

        let rows: Vec<(&str, u32)> = outcome
            .snapshot
            .rows
            .iter()
            .map(|row| (row.text.as_str(), row.count))
            .collect();
        assert_eq!(rows, vec![("\"a\"", 2), ("\"b\"", 1), ("\"a\"", 1)]);
        assert_eq!(outcome.snapshot.logs_count, 3);
        assert!(outcome.requests.is_empty());
    }

    #[tokio::test]
    async fn replay_records_runtime_requests() {
        let script = r#"
{"type":"run"}
{"type":"run"}
{"type":"refresh"}
{"type":"run"}
"#;
        let outcome = replay(controller(false), events(script), false)
            .await
            .expect("replay");

        assert_eq!(
            outcome.requests,
            vec![
                RuntimeCommand::Run,
                RuntimeCommand::Refresh,
                RuntimeCommand::Run
            ]
        );
        assert_eq!(outcome.snapshot.status, SandboxStatus::Running);
    }

    #[tokio::test]
    async fn replay_clear_empties_console() {
        let script = r#"
{"type":"log","client":"c1","id":"1","method":"error","data":["boom"]}
{"type":"clear"}
"#;
        let outcome = replay(controller(true), events(script), false)
            .await
            .expect("replay");
        assert!(outcome.snapshot.empty_logs);
        assert_eq!(outcome.snapshot.logs_count, 0);
    }

    #[tokio::test]
    async fn cmd_replay_renders_text_and_json() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        std::io::Write::write_all(
            &mut file,
            br#"{"type":"log","client":"c1","id":"1","method":"log","data":["hi",{"@t":"[[undefined]]"}]}
"#,
        )
        .expect("write");

        let mut opts = ReplayOpts {
            script: file.path().to_path_buf(),
            json: false,
            follow: false,
            autorun: true,
            show_console: true,
            files: vec!["/App.js".into()],
            open: true,
        };
        let text = cmd_replay(&opts).await.expect("replay");
        assert!(text.contains("Show console (1)"));
        assert!(text.contains("| \"hi\" undefined"));

        opts.json = true;
        let json = cmd_replay(&opts).await.expect("replay");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json output");
        assert_eq!(value["logs_count"], 1);
        assert_eq!(value["rows"][0]["text"], "\"hi\" undefined");
    }
}
