//! Panel visibility, active file tab, and sandbox run status.

use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::types::SandboxStatus;

/// Ordered set of files shown as tabs. Paths are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet(Vec<String>);

impl FileSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files: Vec<String> = Vec::new();
        for path in paths {
            let path = path.into();
            if !files.contains(&path) {
                files.push(path);
            }
        }
        Self(files)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// UI-facing state, independent of log content.
///
/// `active_file` is `None` only while the file set is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub console_visible: bool,
    pub active_file: Option<String>,
    pub status: SandboxStatus,
}

impl ViewState {
    pub fn new(files: &FileSet) -> Self {
        Self {
            console_visible: false,
            active_file: files.first().map(str::to_string),
            status: SandboxStatus::Idle,
        }
    }

    pub fn toggle_panel(&mut self) {
        self.console_visible = !self.console_visible;
    }

    pub fn select_file(&mut self, files: &FileSet, path: &str) -> Result<(), ViewError> {
        if !files.contains(path) {
            return Err(ViewError::UnknownFile(path.to_string()));
        }
        self.active_file = Some(path.to_string());
        Ok(())
    }

    /// Keep the active file when it is still visible, otherwise fall back
    /// to the first visible file.
    pub fn retain_active(&mut self, files: &FileSet) {
        let still_visible = self
            .active_file
            .as_deref()
            .is_some_and(|active| files.contains(active));
        if !still_visible {
            self.active_file = files.first().map(str::to_string);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> FileSet {
        FileSet::new(["/App.js", "/styles.css", "/index.js"])
    }

    #[test]
    fn file_set_deduplicates_in_order() {
        let set = FileSet::new(["/a", "/b", "/a"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), ["/a", "/b"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn new_view_selects_first_file() {
        let view = ViewState::new(&files());
        assert_eq!(view.active_file.as_deref(), Some("/App.js"));
        assert!(!view.console_visible);
        assert_eq!(view.status, SandboxStatus::Idle);
    }

    #[test]
    fn empty_file_set_has_no_active_file() {
        let view = ViewState::new(&FileSet::default());
        assert_eq!(view.active_file, None);
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut view = ViewState::new(&files());
        view.toggle_panel();
        assert!(view.console_visible);
        view.toggle_panel();
        assert!(!view.console_visible);
    }

    #[test]
    fn select_known_file() {
        let mut view = ViewState::new(&files());
        view.select_file(&files(), "/styles.css").expect("known file");
        assert_eq!(view.active_file.as_deref(), Some("/styles.css"));
    }

    #[test]
    fn select_unknown_file_leaves_state() {
        let mut view = ViewState::new(&files());
        view.console_visible = true;
        let before = view.clone();
        let err = view.select_file(&files(), "/missing.js").unwrap_err();
        assert_eq!(err, ViewError::UnknownFile("/missing.js".into()));
        assert_eq!(view, before);
    }

    #[test]
    fn retain_active_falls_back_when_file_disappears() {
        let mut view = ViewState::new(&files());
        view.select_file(&files(), "/index.js").expect("known file");

        view.retain_active(&FileSet::new(["/index.js", "/App.js"]));
        assert_eq!(view.active_file.as_deref(), Some("/index.js"));

        view.retain_active(&FileSet::new(["/App.js"]));
        assert_eq!(view.active_file.as_deref(), Some("/App.js"));
    }
}
