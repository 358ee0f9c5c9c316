//! Bubble layout for transcript messages.

use fitchat_engine::Message;
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// Horizontal padding inside a bubble, per side.
const BUBBLE_PADDING: usize = 1;

/// Animated typing indicator for a placeholder, cycling `.`, `..`, `...`.
pub fn typing_dots(tick: u64) -> &'static str {
    match tick % 3 {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

/// Lay out `messages` as bubble lines for a pane `width` cells wide.
///
/// Bubbles take at most 80% of the width. A blank line separates messages.
pub fn build_lines(
    messages: &[Message],
    width: usize,
    theme: &Theme,
    tick: u64,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }

    let max_bubble = (width * 4 / 5).max(1);
    let max_text = max_bubble.saturating_sub(BUBBLE_PADDING * 2).max(1);

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }

        let text = if message.pending {
            typing_dots(tick)
        } else {
            message.text.as_str()
        };

        let wrapped: Vec<String> = textwrap::wrap(text, max_text)
            .into_iter()
            .map(std::borrow::Cow::into_owned)
            .collect();
        let inner_width = wrapped
            .iter()
            .map(|l| UnicodeWidthStr::width(l.as_str()))
            .max()
            .unwrap_or(0);
        let bubble_width = inner_width + BUBBLE_PADDING * 2;

        let style = if message.is_user() {
            Style::default().fg(theme.on_primary).bg(theme.primary)
        } else {
            Style::default().fg(theme.on_bot_bubble).bg(theme.bot_bubble)
        };

        for row in wrapped {
            let fill = inner_width.saturating_sub(UnicodeWidthStr::width(row.as_str()));
            let body = format!(
                "{pad}{row}{fill}{pad}",
                pad = " ".repeat(BUBBLE_PADDING),
                fill = " ".repeat(fill),
            );

            let line = if message.is_user() {
                let indent = width.saturating_sub(bubble_width);
                Line::from(vec![Span::raw(" ".repeat(indent)), Span::styled(body, style)])
            } else {
                Line::from(Span::styled(body, style))
            };
            lines.push(line);
        }
    }

    lines
}
