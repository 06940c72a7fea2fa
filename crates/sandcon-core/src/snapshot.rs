//! Read model of the console panel handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controller::ConsoleController;
use crate::format::format_entry;
use crate::types::{DisplayEntry, LogMethod, SandboxStatus, Severity};

/// One rendered console row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleRow {
    pub id: String,
    pub method: LogMethod,
    pub severity: Severity,
    pub text: String,
    pub count: u32,
}

impl From<&DisplayEntry> for ConsoleRow {
    fn from(entry: &DisplayEntry) -> Self {
        Self {
            id: entry.source.id.clone(),
            method: entry.source.method.clone(),
            severity: entry.source.method.severity(),
            text: format_entry(&entry.source),
            count: entry.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSnapshot {
    pub generated_at: DateTime<Utc>,
    pub show_console: bool,
    pub console_visible: bool,
    pub files: Vec<String>,
    pub active_file: Option<String>,
    pub status: SandboxStatus,
    pub rows: Vec<ConsoleRow>,
    pub logs_count: usize,
    pub empty_logs: bool,
    pub run_prompt_visible: bool,
    pub controls_visible: bool,
}

impl ConsoleSnapshot {
    pub fn capture(controller: &ConsoleController, now: DateTime<Utc>) -> Self {
        let view = controller.view();
        Self {
            generated_at: now,
            show_console: controller.options().show_console,
            console_visible: view.console_visible,
            files: controller.files().iter().map(str::to_string).collect(),
            active_file: view.active_file.clone(),
            status: view.status,
            rows: controller.display().iter().map(ConsoleRow::from).collect(),
            logs_count: controller.logs_count(),
            empty_logs: controller.empty_logs(),
            run_prompt_visible: controller.run_prompt_visible(),
            controls_visible: controller.controls_visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ConsoleOptions;
    use crate::types::{ClientId, LogEntry};
    use crate::value::LogValue;
    use crate::view_state::FileSet;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn snapshot_reflects_controller() {
        let mut ctl = ConsoleController::new(
            ConsoleOptions {
                show_console: true,
                autorun: true,
            },
            FileSet::new(["/App.js"]),
        );
        let client = ClientId::new("c1");
        ctl.run();
        ctl.toggle_panel();
        ctl.on_log(
            &client,
            LogEntry::new("1", LogMethod::Error, vec![LogValue::from("boom")]),
        );
        ctl.on_log(
            &client,
            LogEntry::new("2", LogMethod::Error, vec![LogValue::from("boom")]),
        );

        let now = ts("2026-02-25T12:00:00Z");
        let snap = ctl.snapshot(now);

        assert_eq!(snap.generated_at, now);
        assert!(snap.console_visible);
        assert_eq!(snap.status, SandboxStatus::Running);
        assert_eq!(snap.logs_count, 1);
        assert!(!snap.empty_logs);
        assert!(snap.controls_visible);
        assert_eq!(
            snap.rows,
            vec![ConsoleRow {
                id: "2".into(),
                method: LogMethod::Error,
                severity: Severity::Error,
                text: "\"boom\"".into(),
                count: 2,
            }]
        );
    }

    #[test]
    fn snapshot_serializes_lowercase_enums() {
        let ctl = ConsoleController::new(ConsoleOptions::default(), FileSet::new(["/a"]));
        let json = serde_json::to_value(ctl.snapshot(ts("2026-02-25T12:00:00Z")))
            .expect("serialize");
        assert_eq!(json["status"], "idle");
        assert_eq!(json["empty_logs"], true);
        assert_eq!(json["files"], serde_json::json!(["/a"]));
    }
}
