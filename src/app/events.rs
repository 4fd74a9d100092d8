//! UI events - key presses translated into runner actions

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Top-level views
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum View {
    #[default]
    Single,
    Batch,
}

impl View {
    pub fn index(&self) -> usize {
        match self {
            View::Single => 0,
            View::Batch => 1,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SwitchView(View),

    // Request list
    SelectPrev,
    SelectNext,

    // Payload editor
    StartEditing,
    CommitEdit,
    CharInput(char),
    Newline,
    Backspace,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,

    // Single request actions
    Refresh,
    Run,
    ClearResult,
    ToggleHeaders,
    ScrollUp,
    ScrollDown,

    // Batch actions
    RunAll,
    ClearAll,

    // Popups
    ToggleHelp,
    CloseHelp,

    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    view: View,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CommitEdit),
            KeyCode::Enter => Some(UiEvent::Newline),
            KeyCode::Tab => Some(UiEvent::CharInput(' ')),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Up => Some(UiEvent::CursorUp),
            KeyCode::Down => Some(UiEvent::CursorDown),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => return Some(UiEvent::SwitchView(View::Single)),
        KeyCode::Char('2') => return Some(UiEvent::SwitchView(View::Batch)),
        KeyCode::Char('a') => return Some(UiEvent::RunAll),
        KeyCode::Char('x') => return Some(UiEvent::ClearAll),
        KeyCode::PageUp => return Some(UiEvent::ScrollUp),
        KeyCode::PageDown => return Some(UiEvent::ScrollDown),
        _ => {}
    }

    match view {
        View::Single => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::Run),
            KeyCode::Char('c') => Some(UiEvent::ClearResult),
            KeyCode::Char('h') => Some(UiEvent::ToggleHeaders),
            _ => None,
        },
        View::Batch => match key.code {
            KeyCode::Enter => Some(UiEvent::RunAll),
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            _ => None,
        },
    }
}
