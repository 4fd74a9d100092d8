//! App state - pure data structure with no I/O logic

use crate::app::events::{InputMode, View};
use crate::error::RunnerError;
use crate::runner::BatchReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

/// One-line message shown in the status bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            kind: StatusKind::Warning,
        }
    }

    pub fn from_error(err: &RunnerError) -> Self {
        StatusMessage {
            text: err.to_string(),
            kind: if err.is_fatal() {
                StatusKind::Error
            } else {
                StatusKind::Warning
            },
        }
    }
}

/// Terminal UI state. Payloads and results live in the runner; this only
/// tracks what is on screen.
#[derive(Debug, Default)]
pub struct AppState {
    pub view: View,

    // Request list
    pub selected: usize,

    // Payload editor (byte-offset cursor)
    pub input_mode: InputMode,
    pub editor: String,
    pub cursor_position: usize,

    // Scrolling
    pub response_scroll: u16,
    pub batch_scroll: u16,

    pub show_headers: bool,
    pub show_help: bool,
    pub is_loading: bool,

    pub status: Option<StatusMessage>,
    pub batch: Option<BatchReport>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based (line, column) of the cursor, column counted in chars
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.editor[..self.cursor_position.min(self.editor.len())];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (line, before[line_start..].chars().count())
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_line_col() {
        let mut state = AppState::new();
        state.editor = "{\n  \"né\": 1\n}".to_string();
        state.cursor_position = 0;
        assert_eq!(state.cursor_line_col(), (0, 0));

        state.cursor_position = state.editor.find(':').unwrap();
        assert_eq!(state.cursor_line_col(), (1, 6));

        state.cursor_position = state.editor.len();
        assert_eq!(state.cursor_line_col(), (2, 1));
    }

    #[test]
    fn test_status_kind_follows_error() {
        assert_eq!(
            StatusMessage::from_error(&RunnerError::CredentialMissing).kind,
            StatusKind::Error
        );
        assert_eq!(
            StatusMessage::from_error(&RunnerError::Transport("timeout".into())).kind,
            StatusKind::Warning
        );
    }
}
