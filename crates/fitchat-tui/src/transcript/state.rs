//! Transcript scroll state.
//!
//! Scrolling is measured in lines from the bottom, so an offset of zero
//! always shows the newest message.

/// Lines scrolled per arrow key or mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Transcript scroll state.
#[derive(Debug, Default)]
pub struct TranscriptState {
    /// Lines scrolled up from the bottom.
    offset: usize,
    /// Last conversation revision this view has shown.
    seen_revision: Option<u64>,
}

impl TranscriptState {
    /// Create a state pinned to the newest message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines scrolled up from the bottom.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the newest message is in view.
    pub fn is_following(&self) -> bool {
        self.offset == 0
    }

    /// Snap to the bottom if the conversation changed since the last sync.
    ///
    /// Returns `true` when it snapped.
    pub fn sync(&mut self, revision: u64) -> bool {
        if self.seen_revision == Some(revision) {
            return false;
        }
        self.seen_revision = Some(revision);
        self.offset = 0;
        true
    }

    /// Scroll towards older messages, stopping at `max_offset`.
    pub fn scroll_up(&mut self, amount: usize, max_offset: usize) {
        self.offset = (self.offset + amount).min(max_offset);
    }

    /// Scroll towards newer messages.
    pub fn scroll_down(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
    }

    /// Jump back to the newest message.
    pub fn jump_to_end(&mut self) {
        self.offset = 0;
    }
}
