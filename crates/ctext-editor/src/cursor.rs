//! Cursor — a position plus the column it wants to return to.
//!
//! Horizontal moves and typing set `desired_col` to wherever the cursor
//! lands. Vertical moves only read it: moving through a short line pulls
//! the column in, and the next long line restores it.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::mode::Mode;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub pos: Position,
    pub desired_col: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { pos: Position::ZERO, desired_col: 0 }
    }

    /// A cursor at `pos` that also wants `pos.col`.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self { pos, desired_col: pos.col }
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    /// Horizontal placement: move and remember the column.
    #[inline]
    pub const fn set_col(&mut self, col: usize) {
        self.pos.col = col;
        self.desired_col = col;
    }

    /// Re-apply the mode's column limit on the current line.
    ///
    /// `desired_col` is left alone. Returns whether the column changed.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor's line is not in `buf`.
    pub fn clamp(&mut self, buf: &Buffer, mode: Mode) -> Result<bool> {
        let max = mode.max_col(buf.line_len(self.pos.line)?);
        if self.pos.col > max {
            self.pos.col = max;
            return Ok(true);
        }
        Ok(false)
    }
}
