//! Chat window widget.
//!
//! Combines the header, the bubble transcript and the input bar.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use fitchat_engine::Message;

use super::input_bar::{InputBar, INPUT_HEIGHT};
use crate::input::InputCursor;
use crate::theme::{IconSet, Theme};
use crate::transcript::{TranscriptState, TranscriptWidget};

/// Title shown in the window header.
pub const WINDOW_TITLE: &str = "Fitness Assistant";

/// Close hint at the right of the header.
pub const CLOSE_HINT: &str = "[x]";

/// Header height (in lines).
const HEADER_HEIGHT: u16 = 1;

/// Areas inside a chat window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSections {
    pub header: Rect,
    pub transcript: Rect,
    pub input: Rect,
}

impl WindowSections {
    /// Split a window area into its sections.
    pub fn new(area: Rect) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(INPUT_HEIGHT),
            ])
            .split(inner);

        Self {
            header: chunks[0],
            transcript: chunks[1],
            input: chunks[2],
        }
    }

    /// Cells covered by the close hint.
    #[allow(clippy::cast_possible_truncation)]
    pub fn close_hint(&self) -> Rect {
        let width = (CLOSE_HINT.len() as u16).min(self.header.width);
        Rect::new(
            (self.header.x + self.header.width).saturating_sub(width + 1),
            self.header.y,
            width,
            self.header.height,
        )
    }
}

/// Chat window with header, transcript and input.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ Fitness Assistant                [x] │
/// │ Hi there! I'm your fitness           │
/// │ assistant. How can I help...         │
/// │                                      │
/// │                      What's a good   │
/// │                      workout?        │
/// │┌────────────────────────────────────┐│
/// ││> █Type a message...              > ││
/// │└────────────────────────────────────┘│
/// └──────────────────────────────────────┘
/// ```
pub struct ChatWindow<'a> {
    messages: &'a [Message],
    transcript: &'a TranscriptState,
    draft: &'a str,
    cursor: InputCursor,
    theme: &'a Theme,
    icons: &'a IconSet,
    tick: u64,
}

impl<'a> ChatWindow<'a> {
    /// Create a new chat window.
    pub fn new(
        messages: &'a [Message],
        transcript: &'a TranscriptState,
        draft: &'a str,
        theme: &'a Theme,
        icons: &'a IconSet,
    ) -> Self {
        Self {
            messages,
            transcript,
            draft,
            cursor: InputCursor::new(),
            theme,
            icons,
            tick: 0,
        }
    }

    /// Set the input cursor.
    #[must_use]
    pub fn cursor(mut self, cursor: InputCursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set the animation tick.
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    fn render_header(&self, sections: &WindowSections, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.theme.on_primary)
            .bg(self.theme.primary);

        let line = Line::from(Span::styled(
            format!(" {WINDOW_TITLE}"),
            style.add_modifier(Modifier::BOLD),
        ));
        Paragraph::new(line).style(style).render(sections.header, buf);

        let hint = sections.close_hint();
        if hint.width > 0 {
            buf.set_stringn(hint.x, hint.y, CLOSE_HINT, usize::from(hint.width), style);
        }
    }
}

impl Widget for ChatWindow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.base));
        block.render(area, buf);

        let sections = WindowSections::new(area);
        self.render_header(&sections, buf);

        TranscriptWidget::new(self.messages, self.transcript, self.theme)
            .tick(self.tick)
            .render(sections.transcript, buf);

        InputBar::new(self.draft, self.cursor, self.theme, self.icons)
            .focused(true)
            .render(sections.input, buf);
    }
}
