//! Plain-text rendering of a console snapshot for terminal output.

use sandcon_core::{ConsoleRow, ConsoleSnapshot, Severity};

const EMPTY_PLACEHOLDER: &str = "No logs yet";

/// Render the sandbox header, controls and console panel.
pub fn render_panel(snap: &ConsoleSnapshot) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = snap
        .files
        .iter()
        .map(|file| {
            if snap.active_file.as_deref() == Some(file.as_str()) {
                format!("[{file}]")
            } else {
                file.clone()
            }
        })
        .collect();
    out.push_str(&format!("files: {}\n", tabs.join(" ")));
    out.push_str(&format!("sandbox: {}\n", snap.status));

    if snap.run_prompt_visible {
        out.push_str("  (Run Sandbox)\n");
    }
    if snap.controls_visible {
        out.push_str("  (Open Sandbox) (Refresh)\n");
    }

    if !snap.show_console {
        return out;
    }

    let marker = if snap.console_visible { "▾" } else { "▸" };
    out.push_str(&format!("{marker} Show console ({})\n", snap.logs_count));
    if !snap.console_visible {
        return out;
    }

    if snap.empty_logs {
        out.push_str(&format!("  {EMPTY_PLACEHOLDER}\n"));
        return out;
    }
    for row in &snap.rows {
        out.push_str(&format_row(row));
    }
    out.push_str("  (Clear logs)\n");
    out
}

/// One row: severity gutter, text (continuation lines indented), count badge.
pub fn format_row(row: &ConsoleRow) -> String {
    let gutter = match row.severity {
        Severity::Error => "!",
        Severity::Note => "|",
    };
    let mut lines = row.text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("  {gutter} {first}");
    for line in lines {
        out.push('\n');
        out.push_str(&format!("  {gutter} {line}"));
    }
    if row.count > 1 {
        out.push_str(&format!("  ({})", row.count));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use sandcon_core::{LogMethod, SandboxStatus};

    fn snapshot() -> ConsoleSnapshot {
        ConsoleSnapshot {
            generated_at: DateTime::parse_from_rfc3339("2026-02-25T12:00:00Z")
                .expect("valid RFC3339")
                .with_timezone(&Utc),
            show_console: true,
            console_visible: true,
            files: vec!["/App.js".into(), "/index.js".into()],
            active_file: Some("/index.js".into()),
            status: SandboxStatus::Running,
            rows: Vec::new(),
            logs_count: 0,
            empty_logs: true,
            run_prompt_visible: false,
            controls_visible: true,
        }
    }

    fn row(text: &str, severity: Severity, count: u32) -> ConsoleRow {
        ConsoleRow {
            id: "1".into(),
            method: LogMethod::Log,
            severity,
            text: text.into(),
            count,
        }
    }

    #[test]
    fn empty_console_shows_placeholder() {
        let out = render_panel(&snapshot());
        assert!(out.contains("files: /App.js [/index.js]"));
        assert!(out.contains("sandbox: running"));
        assert!(out.contains("(Open Sandbox) (Refresh)"));
        assert!(out.contains("▾ Show console (0)"));
        assert!(out.contains(EMPTY_PLACEHOLDER));
        assert!(!out.contains("Clear logs"));
    }

    #[test]
    fn rows_render_with_badge_and_clear_button() {
        let mut snap = snapshot();
        snap.rows = vec![
            row("\"a\"", Severity::Note, 2),
            row("\"boom\"", Severity::Error, 1),
        ];
        snap.logs_count = 2;
        snap.empty_logs = false;

        let out = render_panel(&snap);
        assert!(out.contains("  | \"a\"  (2)\n"));
        assert!(out.contains("  ! \"boom\"\n"));
        assert!(out.contains("(Clear logs)"));
    }

    #[test]
    fn collapsed_console_hides_rows() {
        let mut snap = snapshot();
        snap.console_visible = false;
        snap.rows = vec![row("\"a\"", Severity::Note, 1)];
        snap.logs_count = 1;
        snap.empty_logs = false;

        let out = render_panel(&snap);
        assert!(out.contains("▸ Show console (1)"));
        assert!(!out.contains("\"a\""));
    }

    #[test]
    fn disabled_console_is_not_rendered() {
        let mut snap = snapshot();
        snap.show_console = false;
        assert!(!render_panel(&snap).contains("Show console"));
    }

    #[test]
    fn run_prompt_shown_when_idle_without_autorun() {
        let mut snap = snapshot();
        snap.status = SandboxStatus::Idle;
        snap.controls_visible = false;
        snap.run_prompt_visible = true;
        let out = render_panel(&snap);
        assert!(out.contains("(Run Sandbox)"));
        assert!(!out.contains("(Refresh)"));
    }

    #[test]
    fn multiline_text_keeps_gutter() {
        let out = format_row(&row("{\n  \"x\": 1\n}", Severity::Note, 3));
        assert_eq!(out, "  | {\n  |   \"x\": 1\n  | }  (3)\n");
    }
}
