//! Command handlers - apply UI events to the app state and the runner

use crate::app::events::{InputMode, View};
use crate::app::state::StatusMessage;
use crate::app::AppState;
use crate::catalog::CatalogEntry;
use crate::runner::{BatchReport, Runner};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn selected_entry(&self, runner: &Runner) -> Option<&'static CatalogEntry> {
        runner.catalog().at(self.selected)
    }

    pub fn select_next(&mut self, runner: &mut Runner) {
        if self.selected + 1 < runner.catalog().len() {
            self.selected += 1;
            self.load_selection(runner);
        }
    }

    pub fn select_prev(&mut self, runner: &mut Runner) {
        if self.selected > 0 {
            self.selected -= 1;
            self.load_selection(runner);
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
    }

    /// Fill the editor from the runner's payload state for the selected entry
    pub fn load_selection(&mut self, runner: &mut Runner) {
        self.response_scroll = 0;
        let Some(entry) = self.selected_entry(runner) else {
            return;
        };
        match runner.payload_text(entry.id) {
            Ok(text) => {
                self.editor = text;
                self.cursor_position = 0;
            }
            Err(e) => self.set_status(StatusMessage::from_error(&e)),
        }
        if let Some(rejected) = runner.payload_state(entry.id).and_then(|s| s.rejected()) {
            self.editor = rejected.text.clone();
            self.cursor_position = 0;
            self.set_status(StatusMessage::warning(format!(
                "Invalid JSON format: {}",
                rejected.message
            )));
        }
    }

    // ========================
    // Payload editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.editor.len();
    }

    /// Leave edit mode and hand the text to the runner
    pub fn commit_edit(&mut self, runner: &mut Runner) {
        self.input_mode = InputMode::Normal;
        let Some(entry) = self.selected_entry(runner) else {
            return;
        };
        match runner.edit_payload(entry.id, &self.editor) {
            Ok(()) => self.set_status(StatusMessage::info(format!(
                "Payload for request {} updated",
                entry.id
            ))),
            Err(e) => self.set_status(StatusMessage::warning(format!(
                "{}; the previous payload is kept",
                e
            ))),
        }
    }

    pub fn refresh(&mut self, runner: &mut Runner) {
        let Some(entry) = self.selected_entry(runner) else {
            return;
        };
        match runner.refresh(entry.id) {
            Ok(state) => {
                let status = match state.value() {
                    Some(_) => StatusMessage::info("Payload refreshed from source"),
                    None if entry.method.has_body() => {
                        StatusMessage::warning("No default payload could be extracted")
                    }
                    None => StatusMessage::info("Request takes no payload"),
                };
                self.load_selection(runner);
                self.set_status(status);
            }
            Err(e) => self.set_status(StatusMessage::from_error(&e)),
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            let new_pos = self.editor[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.editor.len() {
            let new_pos = self.editor[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.editor.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line > 0 {
            self.cursor_position = self.offset_of(line - 1, col);
        }
    }

    pub fn move_cursor_down(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line + 1 < self.editor.split('\n').count() {
            self.cursor_position = self.offset_of(line + 1, col);
        }
    }

    /// Byte offset of `col` chars into `line`, clamped to the line's end
    fn offset_of(&self, line: usize, col: usize) -> usize {
        let mut start = 0;
        for (idx, text) in self.editor.split('\n').enumerate() {
            if idx == line {
                return start
                    + text
                        .char_indices()
                        .nth(col)
                        .map(|(i, _)| i)
                        .unwrap_or(text.len());
            }
            start += text.len() + 1;
        }
        self.editor.len()
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if cursor_pos <= self.editor.len() {
            self.editor.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let prev_pos = self.editor[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.editor.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Requests
    // ========================

    pub async fn run_selected(&mut self, runner: &mut Runner) {
        let Some(entry) = self.selected_entry(runner) else {
            return;
        };
        self.is_loading = true;
        let outcome = runner.run(entry.id).await;
        self.is_loading = false;
        self.response_scroll = 0;

        match outcome {
            Ok(result) => self.set_status(StatusMessage::info(format!(
                "Request {} completed: {} in {}ms",
                entry.id,
                result.status,
                result.elapsed.as_millis()
            ))),
            Err(e) => self.set_status(StatusMessage::from_error(&e)),
        }
    }

    pub fn clear_result(&mut self, runner: &mut Runner) {
        let Some(entry) = self.selected_entry(runner) else {
            return;
        };
        if runner.clear_result(entry.id).is_some() {
            self.response_scroll = 0;
            self.set_status(StatusMessage::info(format!(
                "Cleared result for request {}",
                entry.id
            )));
        }
    }

    pub fn begin_batch(&mut self) {
        self.view = View::Batch;
        self.is_loading = true;
        self.batch = None;
        self.batch_scroll = 0;
    }

    pub fn finish_batch(&mut self, report: BatchReport) {
        self.is_loading = false;
        self.set_status(StatusMessage::info(format!(
            "Batch finished: {} succeeded, {} failed",
            report.success_count(),
            report.error_count()
        )));
        self.batch = Some(report);
    }

    pub fn clear_all(&mut self, runner: &mut Runner) {
        runner.clear_results();
        self.batch = None;
        self.batch_scroll = 0;
        self.response_scroll = 0;
        self.set_status(StatusMessage::info("All results cleared"));
    }

    // ========================
    // Display toggles & scrolling
    // ========================

    pub fn toggle_headers(&mut self) {
        self.show_headers = !self.show_headers;
    }

    pub fn scroll_up(&mut self) {
        match self.view {
            View::Single => self.response_scroll = self.response_scroll.saturating_sub(1),
            View::Batch => self.batch_scroll = self.batch_scroll.saturating_sub(1),
        }
    }

    pub fn scroll_down(&mut self) {
        match self.view {
            View::Single => self.response_scroll = self.response_scroll.saturating_add(1),
            View::Batch => self.batch_scroll = self.batch_scroll.saturating_add(1),
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::StatusKind;
    use crate::catalog::Catalog;
    use crate::config::Settings;
    use crate::runner::testing::{FakeTransport, StaticKey};
    use serde_json::json;

    fn setup(transport: &FakeTransport) -> (AppState, Runner) {
        let mut runner = Runner::new(
            Catalog::new(),
            Box::new(StaticKey("tui-key")),
            Box::new(transport.clone()),
            Settings::default(),
        );
        let mut app = AppState::new();
        app.load_selection(&mut runner);
        (app, runner)
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.enter_char(c);
        }
    }

    #[test]
    fn test_selection_loads_payload() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);
        assert!(app.editor.contains("\"tradingPartnerServiceId\""));

        for _ in 0..6 {
            app.select_next(&mut runner);
        }
        assert_eq!(app.selected_entry(&runner).map(|e| e.id), Some(7));
        assert_eq!(app.editor, "{\n  \"x12\": \"example\"\n}");

        app.select_prev(&mut runner);
        assert_eq!(app.selected, 5);
    }

    #[test]
    fn test_selection_stops_at_ends() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);
        app.select_prev(&mut runner);
        assert_eq!(app.selected, 0);

        for _ in 0..30 {
            app.select_next(&mut runner);
        }
        assert_eq!(app.selected, 20);
        assert_eq!(app.editor, "{}");
    }

    #[test]
    fn test_commit_valid_edit() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);

        app.start_editing();
        app.editor.clear();
        app.cursor_position = 0;
        type_text(&mut app, r#"{"a": 1}"#);
        app.commit_edit(&mut runner);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(runner.resolve_payload(1).unwrap(), json!({"a": 1}));
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
    }

    #[test]
    fn test_commit_invalid_edit_keeps_previous() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);
        let before = runner.resolve_payload(1).unwrap();

        app.start_editing();
        app.delete_char();
        app.commit_edit(&mut runner);

        assert_eq!(runner.resolve_payload(1).unwrap(), before);
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Warning);
        assert!(status.text.contains("previous payload is kept"));

        // Coming back to the entry shows the rejected text again
        app.select_next(&mut runner);
        app.select_prev(&mut runner);
        assert!(!app.editor.ends_with('}'));
    }

    #[test]
    fn test_refresh_restores_default() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);
        runner.edit_payload(1, r#"{"mine": true}"#).unwrap();

        app.refresh(&mut runner);
        assert!(app.editor.contains("\"tradingPartnerServiceId\""));
        assert!(!runner.payload_state(1).unwrap().is_edited());
    }

    #[test]
    fn test_cursor_movement_multiline() {
        let mut app = AppState::new();
        app.editor = "ab\nc\ndéf".to_string();
        app.cursor_position = 2;

        app.move_cursor_down();
        assert_eq!(app.cursor_line_col(), (1, 1));
        app.move_cursor_down();
        assert_eq!(app.cursor_line_col(), (2, 1));
        app.move_cursor_right();
        assert_eq!(app.cursor_line_col(), (2, 2));
        app.move_cursor_up();
        assert_eq!(app.cursor_line_col(), (1, 1));
        app.move_cursor_up();
        app.move_cursor_up();
        assert_eq!(app.cursor_line_col(), (0, 1));

        app.cursor_position = app.editor.len();
        app.delete_char();
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.editor, "ab\nc\né");
    }

    #[tokio::test]
    async fn test_run_and_clear_result() {
        let transport = FakeTransport::ok(r#"{"ok": true}"#);
        let (mut app, mut runner) = setup(&transport);

        app.run_selected(&mut runner).await;
        assert!(!app.is_loading);
        assert!(runner.result(1).is_some());
        assert!(app.status.as_ref().unwrap().text.contains("completed: 200"));

        app.clear_result(&mut runner);
        assert!(runner.result(1).is_none());
    }

    #[tokio::test]
    async fn test_batch_lifecycle() {
        let transport = FakeTransport::ok("{}");
        let (mut app, mut runner) = setup(&transport);
        app.switch_view(View::Batch);

        app.begin_batch();
        assert!(app.is_loading);
        let report = runner.run_all(|_| {}).await;
        app.finish_batch(report);
        assert_eq!(app.batch.as_ref().map(BatchReport::len), Some(21));
        assert_eq!(runner.result_count(), 21);

        app.scroll_down();
        assert_eq!(app.batch_scroll, 1);
        app.clear_all(&mut runner);
        assert!(app.batch.is_none());
        assert_eq!(runner.result_count(), 0);
    }
}
