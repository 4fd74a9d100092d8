//! App layer - terminal UI state and command processing
//!
//! Key presses become `UiEvent`s; commands apply them to the `AppState`
//! and the shared `Runner`.

pub mod commands;
pub mod events;
pub mod state;

pub use events::{key_to_ui_event, InputMode, UiEvent, View};
pub use state::AppState;
