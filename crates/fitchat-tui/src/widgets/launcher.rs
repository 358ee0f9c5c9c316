//! Floating launcher button.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::{IconSet, Theme};

/// Width of the launcher button, borders included.
pub const LAUNCHER_WIDTH: u16 = 8;

/// Height of the launcher button, borders included.
pub const LAUNCHER_HEIGHT: u16 = 3;

/// Round-ish button that opens and closes the chat window.
///
/// ```text
/// ┌──────┐
/// │  💬  │
/// └──────┘
/// ```
pub struct Launcher<'a> {
    theme: &'a Theme,
    icons: &'a IconSet,
    open: bool,
}

impl<'a> Launcher<'a> {
    /// Create a new launcher button.
    pub fn new(theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            theme,
            icons,
            open: false,
        }
    }

    /// Set whether the chat window is open (shows the close icon).
    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }
}

impl Widget for Launcher<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.theme.on_primary)
            .bg(self.theme.primary)
            .add_modifier(Modifier::BOLD);

        let icon = if self.open {
            self.icons.close()
        } else {
            self.icons.chat()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.primary))
            .style(style);

        Paragraph::new(icon)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
