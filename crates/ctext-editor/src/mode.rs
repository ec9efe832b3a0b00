//! Editing modes.
//!
//! | Mode    | Cursor shape | Column limit         | Text input goes to |
//! |---------|--------------|----------------------|--------------------|
//! | Normal  | Block        | `0..=len-1` (or 0)   | nowhere            |
//! | Insert  | Bar          | `0..=len`            | the buffer         |
//! | Replace | Underline    | `0..=len`            | the buffer (overwrite) |
//! | Command | Bar          | `0..=len`            | the command line   |
//! | Visual  | Block        | `0..=len`            | nowhere            |
//!
//! Visual is a placeholder: reachable, inert apart from movement.

use ctext_term::ansi::CursorShape;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
    Replace,
    Visual,
}

impl Mode {
    /// Name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Replace => "REPLACE",
            Self::Visual => "VISUAL",
        }
    }

    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal | Self::Visual => CursorShape::Block,
            Self::Insert | Self::Command => CursorShape::Bar,
            Self::Replace => CursorShape::Underline,
        }
    }

    /// Whether the cursor may sit one past the last character.
    ///
    /// Only Normal keeps the cursor on a character.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Whether text input is accepted (and the capture flag is on).
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert | Self::Replace | Self::Command)
    }

    /// Largest legal column on a line of `len` chars.
    #[inline]
    #[must_use]
    pub const fn max_col(self, len: usize) -> usize {
        if self.cursor_past_end() { len } else { len.saturating_sub(1) }
    }
}
