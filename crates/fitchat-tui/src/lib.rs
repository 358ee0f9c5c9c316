//! fitchat-tui: Terminal chat widget for the fitchat fitness assistant
//!
//! This crate provides the TUI layer for fitchat, including:
//! - A floating launcher button in the bottom-right corner
//! - The chat window with bubble transcript and input bar
//! - Keyboard, mouse and paste handling

mod app;
mod event;
mod input;
mod shell;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod transcript;
mod widgets;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use fitchat_engine;
pub use theme::{IconMode, IconSet, Theme};
pub use widgets::{CLOSE_HINT, INPUT_PLACEHOLDER, WINDOW_TITLE};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fitchat_engine::{ChatSession, ReplyProvider};
use ratatui::{backend::Backend, backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// Tick rate for animations and reply polling (4 Hz).
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the chat widget until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. Replies still in flight when the user quits are discarded.
pub async fn run_tui(provider: ReplyProvider) -> Result<(), Box<dyn std::error::Error>> {
    info!(provider = %provider.label(), "Starting chat widget");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(ChatSession::new(provider));
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    app.shutdown();
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.apply_replies();
        draw_on(terminal, app)?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Paste(text) => app.handle_paste(&text),
            Event::Tick => app.tick(),
            // Next draw picks up the new size
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Draw one frame.
fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    app.prepare_frame(area);
    shell::render_shell(app, area, frame.buffer_mut());
}

/// Draw one frame on any backend.
fn draw_on<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    terminal.draw(|frame| draw(frame, app))?;
    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
