//! Application state and update logic for the fitchat TUI.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use fitchat_engine::ChatSession;
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::event::{key_to_action, Action};
use crate::input::InputCursor;
use crate::shell::Regions;
use crate::theme::{IconMode, IconSet, Theme};
use crate::transcript::{TranscriptState, TranscriptWidget, SCROLL_SPEED};
use crate::widgets::WindowSections;

/// Main application state.
pub struct App {
    /// Conversation plus in-flight replies.
    pub session: ChatSession,

    /// Cursor within the conversation draft.
    pub cursor: InputCursor,

    /// Transcript scroll position.
    pub transcript: TranscriptState,

    /// Color theme.
    pub theme: Theme,

    /// Icon set.
    pub icons: IconSet,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Tick counter for animations.
    pub tick_count: u64,

    /// Screen area of the last frame.
    viewport: Rect,
}

impl App {
    /// Create a new app with the theme and icons picked from the environment.
    pub fn new(session: ChatSession) -> Self {
        Self::with_style(
            session,
            Theme::from_env(),
            IconSet::new(IconMode::from_env()),
        )
    }

    /// Create a new app with an explicit theme and icon set.
    pub fn with_style(session: ChatSession, theme: Theme, icons: IconSet) -> Self {
        Self {
            session,
            cursor: InputCursor::new(),
            transcript: TranscriptState::new(),
            theme,
            icons,
            should_quit: false,
            tick_count: 0,
            viewport: Rect::default(),
        }
    }

    /// Whether the chat window is open.
    pub fn is_open(&self) -> bool {
        self.session.state().is_open()
    }

    /// Screen area of the last frame.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Record the screen size and follow new messages before drawing.
    pub fn prepare_frame(&mut self, area: Rect) {
        self.viewport = area;
        self.transcript.sync(self.session.state().revision());
    }

    /// Apply replies that resolved since the last call.
    pub fn apply_replies(&mut self) -> usize {
        let applied = self.session.apply_resolved();
        if applied > 0 {
            debug!(applied, "Applied resolved replies");
        }
        applied
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Stop the app, discarding replies still in flight.
    pub fn shutdown(&mut self) {
        self.should_quit = true;
        self.session.shutdown();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = key_to_action(key, self.is_open());
        self.handle_action(action);
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Toggle => self.toggle(),
            Action::Close => self.session.state_mut().close(),
            Action::Submit => {
                if self.session.submit_draft() {
                    self.cursor.reset();
                }
            }
            Action::Insert(c) => {
                let draft = self.session.state_mut().draft_mut();
                self.cursor.insert(draft, c);
            }
            Action::Backspace => {
                let draft = self.session.state_mut().draft_mut();
                self.cursor.backspace(draft);
            }
            Action::Delete => {
                let draft = self.session.state_mut().draft_mut();
                self.cursor.delete(draft);
            }
            Action::Left => self.cursor.move_left(),
            Action::Right => self.cursor.move_right(self.session.state().draft()),
            Action::Home => self.cursor.move_home(),
            Action::End => self.cursor.move_end(self.session.state().draft()),
            Action::ScrollUp => self.scroll_up(SCROLL_SPEED),
            Action::ScrollDown => self.transcript.scroll_down(SCROLL_SPEED),
            Action::PageUp => self.scroll_up(self.page_size()),
            Action::PageDown => self.transcript.scroll_down(self.page_size()),
            Action::None => {}
        }
    }

    /// Handle pasted text.
    pub fn handle_paste(&mut self, text: &str) {
        if !self.is_open() {
            return;
        }
        // Single-line input
        let flat = text.replace(['\r', '\n'], " ");
        let draft = self.session.state_mut().draft_mut();
        self.cursor.insert_str(draft, &flat);
    }

    /// Handle a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let regions = Regions::new(self.viewport, self.is_open());

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if regions.launcher.contains(pos) {
                    self.toggle();
                } else if let Some(window) = regions.window {
                    if WindowSections::new(window).close_hint().contains(pos) {
                        self.session.state_mut().close();
                    }
                }
            }
            MouseEventKind::ScrollUp if regions.window.is_some_and(|w| w.contains(pos)) => {
                self.scroll_up(SCROLL_SPEED);
            }
            MouseEventKind::ScrollDown if regions.window.is_some_and(|w| w.contains(pos)) => {
                self.transcript.scroll_down(SCROLL_SPEED);
            }
            _ => {}
        }
    }

    fn toggle(&mut self) {
        self.session.state_mut().toggle();
        if self.is_open() {
            self.transcript.jump_to_end();
            self.cursor.clamp(self.session.state().draft());
        }
    }

    /// Transcript area for the current viewport, if the window is showing.
    fn transcript_area(&self) -> Option<Rect> {
        Regions::new(self.viewport, self.is_open())
            .window
            .map(|w| WindowSections::new(w).transcript)
    }

    fn page_size(&self) -> usize {
        self.transcript_area()
            .map_or(SCROLL_SPEED, |a| usize::from(a.height.saturating_sub(1)).max(1))
    }

    fn scroll_up(&mut self, amount: usize) {
        let Some(area) = self.transcript_area() else {
            return;
        };
        let max = TranscriptWidget::max_offset(
            self.session.state().messages(),
            area.width,
            area.height,
            &self.theme,
        );
        self.transcript.scroll_up(amount, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use crossterm::event::{KeyCode, KeyModifiers};
    use fitchat_engine::provider::DEFAULT_REPLY_DELAY;
    use fitchat_engine::{ConversationState, ReplyProvider, ReplyTopic, GREETING};
    use std::time::Duration;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_starts_closed_with_greeting() {
        let app = create_test_app();
        assert!(!app.is_open());
        assert!(!app.should_quit);
        assert_eq!(app.session.state().messages()[0].text, GREETING);
    }

    #[test]
    fn test_q_quits_only_when_closed() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.session.state().draft(), "q");

        press(&mut app, KeyCode::Esc);
        assert!(!app.is_open());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_editing_keys() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        type_text(&mut app, "squts");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session.state().draft(), "squats");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.state().draft(), "quat");
    }

    #[test]
    fn test_draft_survives_close_and_reopen() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        type_text(&mut app, "bench");
        app.handle_action(Action::Close);
        app.handle_action(Action::Toggle);
        assert_eq!(app.session.state().draft(), "bench");
        assert_eq!(app.cursor.position(), 5);
    }

    #[test]
    fn test_whitespace_enter_is_noop() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.state().len(), 1);
        assert_eq!(app.session.state().draft(), "   ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_submits_and_reply_arrives() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        type_text(&mut app, "What's a good workout?");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.state().len(), 3);
        assert!(app.session.state().draft().is_empty());
        assert_eq!(app.cursor.position(), 0);
        assert_eq!(app.apply_replies(), 0);

        tokio::time::sleep(DEFAULT_REPLY_DELAY + Duration::from_millis(10)).await;
        assert_eq!(app.apply_replies(), 1);
        assert_eq!(
            app.session.state().last().unwrap().text,
            ReplyTopic::Workout.response()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_discards_pending_reply() {
        let mut app = create_test_app();
        app.handle_action(Action::Toggle);
        type_text(&mut app, "diet");
        press(&mut app, KeyCode::Enter);
        app.shutdown();

        tokio::time::sleep(DEFAULT_REPLY_DELAY * 2).await;
        assert_eq!(app.apply_replies(), 0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_click_launcher_toggles() {
        let mut app = create_test_app();
        app.prepare_frame(Rect::new(0, 0, 80, 24));

        click(&mut app, 74, 21);
        assert!(app.is_open());
        click(&mut app, 74, 21);
        assert!(!app.is_open());

        // Clicking elsewhere does nothing.
        click(&mut app, 5, 5);
        assert!(!app.is_open());
    }

    #[test]
    fn test_click_close_hint() {
        let mut app = create_test_app();
        app.prepare_frame(Rect::new(0, 0, 80, 24));
        app.handle_action(Action::Toggle);

        // Window spans columns 31..79, header on row 2.
        click(&mut app, 75, 2);
        assert!(!app.is_open());
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut app = create_test_app();
        app.handle_paste("ignored");
        assert!(app.session.state().draft().is_empty());

        app.handle_action(Action::Toggle);
        app.handle_paste("leg day\nplan");
        assert_eq!(app.session.state().draft(), "leg day plan");
    }

    fn app_with_history(turns: usize) -> App {
        let mut state = ConversationState::new();
        for i in 0..turns {
            let pending = state.submit_message(&format!("set {i} done")).unwrap();
            state.resolve_reply(pending.placeholder_id, "Nice work, keep going!");
        }
        let session = ChatSession::with_state(state, ReplyProvider::keyword());
        App::with_style(session, Theme::default(), IconSet::new(IconMode::Ascii))
    }

    #[test]
    fn test_scroll_needs_overflow() {
        let mut app = create_test_app();
        app.prepare_frame(Rect::new(0, 0, 80, 24));
        app.handle_action(Action::Toggle);

        app.handle_action(Action::PageUp);
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_scroll_and_snap_on_new_message() {
        let mut app = app_with_history(10);
        app.handle_action(Action::Toggle);
        app.prepare_frame(Rect::new(0, 0, 80, 24));

        app.handle_action(Action::PageUp);
        let paged = app.transcript.offset();
        assert!(paged > 0);

        app.handle_action(Action::ScrollDown);
        assert_eq!(app.transcript.offset(), paged.saturating_sub(SCROLL_SPEED));

        // Redrawing without changes keeps the position.
        app.prepare_frame(Rect::new(0, 0, 80, 24));
        assert!(!app.transcript.is_following());

        app.session.state_mut().submit_message("one more set");
        app.prepare_frame(Rect::new(0, 0, 80, 24));
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_scroll_ignored_while_closed() {
        let mut app = app_with_history(10);
        app.prepare_frame(Rect::new(0, 0, 80, 24));
        app.handle_action(Action::ScrollUp);
        assert!(app.transcript.is_following());
    }

    #[test]
    fn test_tick_advances() {
        let mut app = create_test_app();
        app.tick();
        app.tick();
        assert_eq!(app.tick_count, 2);
    }
}
