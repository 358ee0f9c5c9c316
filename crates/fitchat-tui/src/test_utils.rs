//! Test utilities for fitchat-tui rendering tests.
//!
//! Helpers for creating test terminals and apps, and for turning buffers
//! into strings that tests can search.

use crate::app::App;
use crate::theme::{IconMode, IconSet, Theme};
use fitchat_engine::{ChatSession, ReplyProvider};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT)
}

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app with the keyword provider, default theme and ASCII icons.
pub fn create_test_app() -> App {
    let session = ChatSession::new(ReplyProvider::keyword());
    App::with_style(session, Theme::default(), IconSet::new(IconMode::Ascii))
}

/// Convert a buffer to a string, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render the app into an 80x24 buffer and return it as a string.
pub fn render_app_to_string(app: &mut App) -> String {
    render_app_to_string_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the app into a buffer of custom size and return it as a string.
pub fn render_app_to_string_sized(app: &mut App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    app.prepare_frame(area);
    crate::shell::render_shell(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(!app.is_open());
        assert_eq!(app.session.state().len(), 1);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert_eq!(result, "Hello\nWorld\n");
    }
}
