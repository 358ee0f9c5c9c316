//! UI widgets for the chat widget.
//!
//! This module provides:
//! - [`Launcher`] - Floating button that opens and closes the chat
//! - [`ChatWindow`] - Header, transcript and input in one bordered window
//! - `InputBar` - Single-line draft editor with placeholder

mod chat_window;
mod input_bar;
mod launcher;

pub use chat_window::{ChatWindow, WindowSections, CLOSE_HINT, WINDOW_TITLE};
pub use input_bar::INPUT_PLACEHOLDER;
pub use launcher::{Launcher, LAUNCHER_HEIGHT, LAUNCHER_WIDTH};
