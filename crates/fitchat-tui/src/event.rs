//! Event handling for the fitchat TUI.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Text was pasted.
    Paste(String),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm reads are blocking, so poll on a plain thread
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Paste(text)) => Some(Event::Paste(text)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(Event::Tick)
                };

                if let Some(e) = event {
                    if tx_clone.send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Toggle,
    Close,
    Submit,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    None,
}

/// Convert a key event to an action.
///
/// `open` is whether the chat window is showing; most keys only act on the
/// open window.
pub fn key_to_action(key: KeyEvent, open: bool) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('o') => Action::Toggle,
            _ => Action::None,
        };
    }

    if key.code == KeyCode::F(2) {
        return Action::Toggle;
    }

    if !open {
        return match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Enter => Action::Toggle,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Close,
        KeyCode::Enter => Action::Submit,
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up => Action::ScrollUp,
        KeyCode::Down => Action::ScrollDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_global_keys() {
        for open in [true, false] {
            assert_eq!(key_to_action(ctrl('c'), open), Action::Quit);
            assert_eq!(key_to_action(ctrl('o'), open), Action::Toggle);
            assert_eq!(key_to_action(key(KeyCode::F(2)), open), Action::Toggle);
        }
    }

    #[test]
    fn test_closed_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q')), false), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Enter), false), Action::Toggle);
        assert_eq!(key_to_action(key(KeyCode::Char('x')), false), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Up), false), Action::None);
    }

    #[test]
    fn test_open_keys_edit_draft() {
        // 'q' is text while typing
        assert_eq!(
            key_to_action(key(KeyCode::Char('q')), true),
            Action::Insert('q')
        );
        let shifted = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shifted, true), Action::Insert('W'));
        assert_eq!(key_to_action(key(KeyCode::Enter), true), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Esc), true), Action::Close);
        assert_eq!(key_to_action(key(KeyCode::PageUp), true), Action::PageUp);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(release, true), Action::None);
    }
}
