//! Transcript widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
};

use fitchat_engine::Message;

use super::layout::build_lines;
use super::state::TranscriptState;
use crate::theme::Theme;

/// Scrollable bubble transcript.
///
/// The visible slice is computed from the bottom: an offset of zero shows
/// the last `area.height` lines.
pub struct TranscriptWidget<'a> {
    messages: &'a [Message],
    state: &'a TranscriptState,
    theme: &'a Theme,
    tick: u64,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a new transcript widget.
    pub fn new(messages: &'a [Message], state: &'a TranscriptState, theme: &'a Theme) -> Self {
        Self {
            messages,
            state,
            theme,
            tick: 0,
        }
    }

    /// Set the animation tick for typing indicators.
    #[must_use]
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Largest useful scroll offset for a pane of the given size.
    pub fn max_offset(messages: &[Message], width: u16, height: u16, theme: &Theme) -> usize {
        let total = build_lines(messages, usize::from(width), theme, 0).len();
        total.saturating_sub(usize::from(height))
    }
}

impl Widget for TranscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = build_lines(self.messages, usize::from(area.width), self.theme, self.tick);
        let height = usize::from(area.height);
        let max_offset = lines.len().saturating_sub(height);
        let offset = self.state.offset().min(max_offset);
        let start = max_offset - offset;
        let end = (start + height).min(lines.len());

        let visible = lines[start..end].to_vec();
        Paragraph::new(visible)
            .style(Style::default().fg(self.theme.text).bg(self.theme.base))
            .render(area, buf);
    }
}
