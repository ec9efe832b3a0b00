//! Viewport — which lines are on screen.
//!
//! `scroll` is the first visible position; `last_line` is one past the last
//! visible line. Both are kept in step with the cursor by the movement
//! code and recomputed from the window geometry on every render.
//!
//! Until the first render the whole document counts as visible
//! (`last_line == line_count`).

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll: Position,
    last_line: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(line_count: usize) -> Self {
        Self { scroll: Position::ZERO, last_line: line_count }
    }

    /// First visible line.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> usize {
        self.scroll.line
    }

    /// One past the last visible line.
    #[inline]
    #[must_use]
    pub const fn last_line(&self) -> usize {
        self.last_line
    }

    /// Derive `last_line` from the window geometry.
    ///
    /// `origin_y` is where text starts inside a window `window_height` tall;
    /// all three are in the same unit as `line_height` (rows, for a terminal).
    pub fn recompute(&mut self, window_height: usize, origin_y: usize, line_height: usize, line_count: usize) {
        let rows = window_height.saturating_sub(origin_y) / line_height.max(1);
        self.last_line = (self.scroll.line + rows).min(line_count);
    }

    /// Scroll so that `line`, just moved down to, is visible.
    pub fn follow_down(&mut self, line: usize) {
        while line >= self.last_line {
            self.last_line += 1;
            self.scroll.line += 1;
        }
        self.scroll.line = self.scroll.line.min(line);
    }

    /// Scroll so that `line`, just moved up to, is visible.
    pub const fn follow_up(&mut self, line: usize) {
        if line < self.scroll.line {
            let shift = self.scroll.line - line;
            self.scroll.line = line;
            self.last_line = self.last_line.saturating_sub(shift);
        }
    }

    /// Scroll one line down without moving the cursor. The last line always
    /// stays on screen.
    pub fn scroll_down(&mut self, line_count: usize) -> bool {
        if self.scroll.line + 1 >= line_count {
            return false;
        }
        self.scroll.line += 1;
        self.last_line = (self.last_line + 1).min(line_count);
        true
    }

    /// Scroll one line up without moving the cursor.
    pub const fn scroll_up(&mut self) -> bool {
        if self.scroll.line == 0 {
            return false;
        }
        self.scroll.line -= 1;
        self.last_line = self.last_line.saturating_sub(1);
        true
    }

    /// Whether `line` is inside `[top, last_line)`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.scroll.line && line < self.last_line
    }
}
