//! Cursor editing over the conversation draft.
//!
//! The draft text itself lives in the engine's conversation state; this
//! module only tracks where the cursor sits and applies edits to the
//! borrowed string. Positions are character indices, not bytes.

/// Cursor state for single-line draft editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputCursor {
    /// Cursor position (character index).
    pos: usize,
}

/// Byte offset of the `char_idx`-th character (or the end of `s`).
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

impl InputCursor {
    /// Create a cursor at the start of an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position as a character index.
    pub fn position(self) -> usize {
        self.pos
    }

    /// Move back to the start (after a submit clears the draft).
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Keep the cursor inside `draft` after external changes.
    pub fn clamp(&mut self, draft: &str) {
        self.pos = self.pos.min(draft.chars().count());
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, draft: &mut String, ch: char) {
        self.clamp(draft);
        let at = byte_index(draft, self.pos);
        draft.insert(at, ch);
        self.pos += 1;
    }

    /// Insert a string at the cursor (paste).
    pub fn insert_str(&mut self, draft: &mut String, s: &str) {
        self.clamp(draft);
        let at = byte_index(draft, self.pos);
        draft.insert_str(at, s);
        self.pos += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self, draft: &mut String) {
        self.clamp(draft);
        if self.pos > 0 {
            self.pos -= 1;
            let at = byte_index(draft, self.pos);
            draft.remove(at);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self, draft: &mut String) {
        self.clamp(draft);
        if self.pos < draft.chars().count() {
            let at = byte_index(draft, self.pos);
            draft.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self, draft: &str) {
        if self.pos < draft.chars().count() {
            self.pos += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.pos = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self, draft: &str) {
        self.pos = draft.chars().count();
    }

    /// Split `draft` at the cursor into (before, after).
    pub fn split<'d>(self, draft: &'d str) -> (&'d str, &'d str) {
        draft.split_at(byte_index(draft, self.pos))
    }
}
