//! Color palette for the chat widget.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub muted: Color,

    // Brand accent (launcher, header, user bubbles)
    pub primary: Color,
    pub on_primary: Color,

    // Bot bubbles
    pub bot_bubble: Color,
    pub on_bot_bubble: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::brand()
    }
}

impl Theme {
    /// Default theme: blue accent on a light window.
    pub fn brand() -> Self {
        Self {
            base: Color::Rgb(249, 250, 251),    // #f9fafb
            surface: Color::Rgb(243, 244, 246), // #f3f4f6

            text: Color::Rgb(31, 41, 55),     // #1f2937
            muted: Color::Rgb(107, 114, 128), // #6b7280

            primary: Color::Rgb(37, 99, 235), // #2563eb
            on_primary: Color::White,

            bot_bubble: Color::Rgb(229, 231, 235),    // #e5e7eb
            on_bot_bubble: Color::Rgb(31, 41, 55),    // #1f2937

            border: Color::Rgb(209, 213, 219),         // #d1d5db
            border_focused: Color::Rgb(59, 130, 246),  // #3b82f6
        }
    }

    /// High contrast theme, also used when `NO_COLOR` is set.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::Black,

            text: Color::White,
            muted: Color::Gray,

            primary: Color::Cyan,
            on_primary: Color::Black,

            bot_bubble: Color::DarkGray,
            on_bot_bubble: Color::White,

            border: Color::White,
            border_focused: Color::Cyan,
        }
    }

    /// Pick a theme from the environment.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::high_contrast()
        } else {
            Self::brand()
        }
    }
}
