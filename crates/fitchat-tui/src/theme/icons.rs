//! Icon sets with Unicode and ASCII fallback.

/// Icon mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Standard Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback (also used with `NO_COLOR`).
    Ascii,
}

impl IconMode {
    /// Create mode from environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Icon set based on configured mode.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    /// Create a new icon set with the specified mode.
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    /// Get the current icon mode.
    pub fn mode(&self) -> IconMode {
        self.mode
    }

    /// Launcher icon while the chat is closed.
    pub fn chat(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "💬",
            IconMode::Ascii => "(..)",
        }
    }

    /// Launcher icon while the chat is open.
    pub fn close(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✕",
            IconMode::Ascii => "x",
        }
    }

    /// Send hint shown in the input row.
    pub fn send(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "➤",
            IconMode::Ascii => ">",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_icons_are_ascii() {
        let icons = IconSet::new(IconMode::Ascii);
        for icon in [icons.chat(), icons.close(), icons.send()] {
            assert!(icon.is_ascii(), "{icon} is not ASCII");
        }
    }

    #[test]
    fn test_open_and_closed_icons_differ() {
        let icons = IconSet::default();
        assert_eq!(icons.mode(), IconMode::Unicode);
        assert_ne!(icons.chat(), icons.close());
    }
}
