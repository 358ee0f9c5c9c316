//! Transcript pane.
//!
//! Renders the conversation as chat bubbles and tracks scrolling:
//! - User messages are right-aligned in the accent color
//! - Bot messages are left-aligned in the neutral color
//! - The view snaps to the newest message whenever the conversation changes

mod layout;
mod state;
mod widget;

pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::TranscriptWidget;
