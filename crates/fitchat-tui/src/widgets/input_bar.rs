//! Single-line input bar.
//!
//! Shows the draft with a block cursor, or a muted placeholder when the
//! draft is empty. Long drafts scroll horizontally to keep the cursor in view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::input::InputCursor;
use crate::theme::{IconSet, Theme};

/// Placeholder shown while the draft is empty.
pub const INPUT_PLACEHOLDER: &str = "Type a message...";

/// Height of the input bar, borders included.
pub const INPUT_HEIGHT: u16 = 3;

const PROMPT: &str = "> ";
const CURSOR: &str = "█";

/// Input bar for the chat window.
pub struct InputBar<'a> {
    draft: &'a str,
    cursor: InputCursor,
    theme: &'a Theme,
    icons: &'a IconSet,
    focused: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(draft: &'a str, cursor: InputCursor, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            draft,
            cursor,
            theme,
            icons,
            focused: false,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Build the visible spans for a text area `width` cells wide.
    fn build_line(&self, width: usize) -> Line<'static> {
        let text_style = Style::default().fg(self.theme.text);
        let mut spans = vec![Span::styled(PROMPT, Style::default().fg(self.theme.primary))];

        if self.draft.is_empty() {
            if self.focused {
                spans.push(Span::styled(CURSOR, text_style));
            }
            spans.push(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default().fg(self.theme.muted),
            ));
            return Line::from(spans);
        }

        let (before, after) = self.cursor.split(self.draft);
        let cursor_width = usize::from(self.focused);
        let avail = width.saturating_sub(PROMPT.len() + cursor_width);

        // Drop leading characters until the cursor fits.
        let mut visible_before = before;
        while UnicodeWidthStr::width(visible_before) > avail {
            let mut chars = visible_before.chars();
            chars.next();
            visible_before = chars.as_str();
        }

        let mut remaining = avail.saturating_sub(UnicodeWidthStr::width(visible_before));
        let mut visible_after = String::new();
        for ch in after.chars() {
            let w = ch.width().unwrap_or(0);
            if w > remaining {
                break;
            }
            remaining -= w;
            visible_after.push(ch);
        }

        spans.push(Span::styled(visible_before.to_string(), text_style));
        if self.focused {
            spans.push(Span::styled(CURSOR, text_style));
        }
        spans.push(Span::styled(visible_after, text_style));
        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let send = self.icons.send();
        let send_width = u16::try_from(UnicodeWidthStr::width(send)).unwrap_or(1);
        let text_width = inner.width.saturating_sub(send_width + 1);

        let text_area = Rect::new(inner.x, inner.y, text_width, 1);
        Paragraph::new(self.build_line(usize::from(text_width))).render(text_area, buf);

        if text_width < inner.width {
            let send_style = if self.draft.trim().is_empty() {
                Style::default().fg(self.theme.muted)
            } else {
                Style::default().fg(self.theme.primary)
            };
            buf.set_string(inner.x + inner.width - send_width, inner.y, send, send_style);
        }
    }
}
