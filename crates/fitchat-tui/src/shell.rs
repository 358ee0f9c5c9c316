//! Screen layout: the launcher in the bottom-right corner with the chat
//! window floating above it.

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::app::App;
use crate::widgets::{ChatWindow, Launcher, LAUNCHER_HEIGHT, LAUNCHER_WIDTH};

/// Maximum chat window width.
pub const WINDOW_MAX_WIDTH: u16 = 48;
/// Maximum chat window height.
pub const WINDOW_MAX_HEIGHT: u16 = 20;
/// Smallest window height that still fits header, transcript and input.
pub const WINDOW_MIN_HEIGHT: u16 = 7;

/// Gap between the widget and the screen edge.
const MARGIN: u16 = 1;

/// Where the widget parts sit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub launcher: Rect,
    /// `None` while closed or when the screen is too small.
    pub window: Option<Rect>,
}

impl Regions {
    /// Compute regions for a screen `area`.
    pub fn new(area: Rect, open: bool) -> Self {
        let launcher_width = LAUNCHER_WIDTH.min(area.width);
        let launcher_height = LAUNCHER_HEIGHT.min(area.height);
        let right = area.x + area.width;
        let bottom = area.y + area.height;

        let launcher = Rect::new(
            right.saturating_sub(launcher_width + MARGIN).max(area.x),
            bottom.saturating_sub(launcher_height + MARGIN).max(area.y),
            launcher_width,
            launcher_height,
        );

        let window = if open {
            let width = WINDOW_MAX_WIDTH.min(area.width.saturating_sub(MARGIN * 2));
            let height = WINDOW_MAX_HEIGHT.min(launcher.y.saturating_sub(area.y + MARGIN));
            (height >= WINDOW_MIN_HEIGHT && width > 0).then(|| {
                Rect::new(
                    right.saturating_sub(width + MARGIN),
                    launcher.y - height,
                    width,
                    height,
                )
            })
        } else {
            None
        };

        Self { launcher, window }
    }
}

/// Render the whole screen for `app`.
pub fn render_shell(app: &App, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, Style::default().bg(app.theme.surface));

    let regions = Regions::new(area, app.is_open());

    if let Some(window) = regions.window {
        let state = app.session.state();
        ChatWindow::new(
            state.messages(),
            &app.transcript,
            state.draft(),
            &app.theme,
            &app.icons,
        )
        .cursor(app.cursor)
        .tick(app.tick_count)
        .render(window, buf);
    }

    Launcher::new(&app.theme, &app.icons)
        .open(app.is_open())
        .render(regions.launcher, buf);
}
