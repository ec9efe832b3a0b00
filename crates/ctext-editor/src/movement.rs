//! Cursor motion.
//!
//! Every motion returns `Ok(changed)`. `false` means nothing moved, which
//! the session uses to skip a repaint. Motions keep three things true:
//!
//! - the cursor is inside the buffer and inside the mode's column limit
//! - horizontal motion sets `desired_col`; vertical motion only reads it
//! - after any line change the cursor's line is inside the viewport
//!
//! Ctrl+Up/Down scroll the viewport by one line and leave the cursor alone.

use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::mode::Mode;
use crate::position::Position;
use crate::word;

impl Document {
    /// Fail if the cursor is not on the buffer. Motions call this first.
    fn check_cursor(&self) -> Result<()> {
        let pos = self.cursor.pos;
        let len = self.buffer.line_len(pos.line)?;
        if pos.col > len {
            return Err(EditorError::out_of_range(pos, self.buffer.line_count()));
        }
        Ok(())
    }

    fn is_last_line(&self) -> bool {
        self.cursor.line() + 1 >= self.buffer.line_count()
    }

    // -- horizontal ---------------------------------------------------------

    /// Right one column, or to the start of the next line at the limit.
    /// With `ctrl`, to the start of the next word.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_right(&mut self, ctrl: bool) -> Result<bool> {
        self.check_cursor()?;
        let Position { line, col } = self.cursor.pos;
        let bound = self.max_col(line)?;

        if col < bound {
            let target = if ctrl {
                word::skip_forward(&self.current_chars()?, col, bound)
            } else {
                col + 1
            };
            self.cursor.set_col(target);
            return Ok(target != col);
        }

        if !self.is_last_line() {
            self.cursor.pos = Position::new(line + 1, 0);
            self.cursor.desired_col = 0;
            self.viewport.follow_down(line + 1);
            return Ok(true);
        }

        if self.mode == Mode::Normal {
            self.cursor.pos.col = bound;
        }
        Ok(false)
    }

    /// Left one column, or to the end of the previous line at column 0.
    /// With `ctrl`, to the start of the previous word.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_left(&mut self, ctrl: bool) -> Result<bool> {
        self.check_cursor()?;
        let Position { line, col } = self.cursor.pos;

        if col > 0 {
            let target = if ctrl { word::skip_backward(&self.current_chars()?, col) } else { col - 1 };
            self.cursor.set_col(target);
            return Ok(target != col);
        }

        if line == 0 {
            return Ok(false);
        }
        let end = self.max_col(line - 1)?;
        self.cursor.pos.line = line - 1;
        self.cursor.set_col(end);
        self.viewport.follow_up(line - 1);
        Ok(true)
    }

    /// Column 0.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_home(&mut self) -> Result<bool> {
        self.check_cursor()?;
        if self.cursor.col() == 0 {
            return Ok(false);
        }
        self.cursor.set_col(0);
        Ok(true)
    }

    /// Last character, or one past it in Insert mode.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_end(&mut self) -> Result<bool> {
        self.check_cursor()?;
        let len = self.buffer.line_len(self.cursor.line())?;
        if len == 0 {
            return Ok(false);
        }
        let target = if self.mode == Mode::Insert { len } else { len - 1 };
        let changed = target != self.cursor.col();
        self.cursor.set_col(target);
        Ok(changed)
    }

    // -- vertical -----------------------------------------------------------

    /// Down one line, scrolling if the cursor leaves the viewport.
    /// With `ctrl`, scroll the viewport down one line instead.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_down(&mut self, ctrl: bool) -> Result<bool> {
        self.check_cursor()?;
        if self.is_last_line() {
            return Ok(false);
        }
        if ctrl {
            return Ok(self.viewport.scroll_down(self.buffer.line_count()));
        }

        let line = self.cursor.line() + 1;
        self.cursor.pos.line = line;
        self.viewport.follow_down(line);
        self.cursor.pos.col = self.cursor.desired_col.min(self.max_col(line)?);
        Ok(true)
    }

    /// Up one line, scrolling if the cursor leaves the viewport.
    /// With `ctrl`, scroll the viewport up one line instead.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn move_up(&mut self, ctrl: bool) -> Result<bool> {
        self.check_cursor()?;
        if ctrl {
            return Ok(self.viewport.scroll_up());
        }
        if self.cursor.line() == 0 {
            return Ok(false);
        }

        let line = self.cursor.line() - 1;
        self.cursor.pos.line = line;
        self.viewport.follow_up(line);
        self.cursor.pos.col = self.cursor.desired_col.min(self.max_col(line)?);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::new(lines.iter().map(|s| (*s).to_string()).collect(), None)
    }

    fn insert_doc(lines: &[&str]) -> Document {
        let mut d = doc(lines);
        d.set_mode(Mode::Insert).unwrap();
        d
    }

    fn at(d: &Document) -> (usize, usize) {
        (d.pos().line, d.pos().col)
    }

    // -- right --------------------------------------------------------------

    #[test]
    fn right_stops_on_last_char_in_normal() {
        let mut d = doc(&["abc"]);
        assert!(d.move_right(false).unwrap());
        assert!(d.move_right(false).unwrap());
        assert!(!d.move_right(false).unwrap());
        assert_eq!(at(&d), (0, 2));
    }

    #[test]
    fn right_reaches_past_end_in_insert() {
        let mut d = insert_doc(&["abc"]);
        for _ in 0..3 {
            assert!(d.move_right(false).unwrap());
        }
        assert_eq!(at(&d), (0, 3));
        assert!(!d.move_right(false).unwrap());
        assert_eq!(at(&d), (0, 3));
    }

    #[test]
    fn right_wraps_to_next_line() {
        let mut d = doc(&["ab", "cd"]);
        d.place(0, 1);
        assert!(d.move_right(false).unwrap());
        assert_eq!(at(&d), (1, 0));
        assert_eq!(d.cursor().desired_col, 0);
    }

    #[test]
    fn right_on_empty_last_line_is_noop() {
        let mut d = doc(&[""]);
        assert!(!d.move_right(false).unwrap());
        assert_eq!(at(&d), (0, 0));
    }

    #[test]
    fn right_updates_desired_col() {
        let mut d = doc(&["abcdef"]);
        d.move_right(false).unwrap();
        d.move_right(false).unwrap();
        assert_eq!(d.cursor().desired_col, 2);
    }

    #[test]
    fn ctrl_right_lands_on_next_word() {
        let mut d = doc(&["foo bar"]);
        assert!(d.move_right(true).unwrap());
        assert_eq!(at(&d), (0, 4));
        assert_eq!(d.cursor().desired_col, 4);
    }

    #[test]
    fn ctrl_right_last_word_stops_at_limit() {
        let mut d = doc(&["foo bar"]);
        d.place(0, 4);
        d.move_right(true).unwrap();
        assert_eq!(at(&d), (0, 6));

        let mut d = insert_doc(&["foo bar"]);
        d.place(0, 4);
        d.move_right(true).unwrap();
        assert_eq!(at(&d), (0, 7));
    }

    // -- left ---------------------------------------------------------------

    #[test]
    fn left_at_origin_is_noop() {
        let mut d = doc(&["abc"]);
        assert!(!d.move_left(false).unwrap());
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let mut d = doc(&["abc", "d"]);
        d.place(1, 0);
        assert!(d.move_left(false).unwrap());
        assert_eq!(at(&d), (0, 2));
        assert_eq!(d.cursor().desired_col, 2);

        let mut d = insert_doc(&["abc", "d"]);
        d.place(1, 0);
        d.move_left(false).unwrap();
        assert_eq!(at(&d), (0, 3));
    }

    #[test]
    fn left_wrap_onto_empty_line() {
        let mut d = doc(&["", "x"]);
        d.place(1, 0);
        d.move_left(false).unwrap();
        assert_eq!(at(&d), (0, 0));
    }

    #[test]
    fn ctrl_left_to_word_start() {
        let mut d = doc(&["foo bar"]);
        d.place(0, 4);
        assert!(d.move_left(true).unwrap());
        assert_eq!(at(&d), (0, 0));
    }

    // -- home / end ---------------------------------------------------------

    #[test]
    fn home_at_zero_is_noop() {
        let mut d = doc(&["abc"]);
        assert!(!d.move_home().unwrap());
        d.place(0, 2);
        assert!(d.move_home().unwrap());
        assert_eq!(d.cursor().desired_col, 0);
    }

    #[test]
    fn end_depends_on_mode() {
        let mut d = doc(&["abc"]);
        assert!(d.move_end().unwrap());
        assert_eq!(at(&d), (0, 2));

        let mut d = insert_doc(&["abc"]);
        assert!(d.move_end().unwrap());
        assert_eq!(at(&d), (0, 3));
    }

    #[test]
    fn end_on_empty_line_is_noop() {
        let mut d = insert_doc(&[""]);
        assert!(!d.move_end().unwrap());
    }

    // -- vertical -----------------------------------------------------------

    #[test]
    fn desired_col_survives_short_line() {
        let mut d = doc(&["0123456789", "ab", "0123456789"]);
        d.place(0, 5);
        d.move_down(false).unwrap();
        assert_eq!(at(&d), (1, 1));
        d.move_down(false).unwrap();
        assert_eq!(at(&d), (2, 5));
        d.move_up(false).unwrap();
        d.move_up(false).unwrap();
        assert_eq!(at(&d), (0, 5));
    }

    #[test]
    fn down_on_last_line_is_noop() {
        let mut d = doc(&["a", "b"]);
        d.place(1, 0);
        assert!(!d.move_down(false).unwrap());
        assert!(!d.move_down(true).unwrap());
    }

    #[test]
    fn up_on_first_line_is_noop() {
        let mut d = doc(&["a", "b"]);
        assert!(!d.move_up(false).unwrap());
    }

    #[test]
    fn down_scrolls_viewport() {
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let mut d = Document::new(lines, None);
        d.viewport_mut().recompute(3, 0, 1, 10);
        for _ in 0..4 {
            d.move_down(false).unwrap();
        }
        assert_eq!(d.pos().line, 4);
        assert_eq!(d.viewport().top(), 2);
        assert_eq!(d.viewport().last_line(), 5);
        for _ in 0..4 {
            d.move_up(false).unwrap();
        }
        assert_eq!(d.viewport().top(), 0);
    }

    #[test]
    fn ctrl_down_scrolls_without_moving() {
        let mut d = doc(&["a", "b", "c"]);
        assert!(d.move_down(true).unwrap());
        assert_eq!(d.viewport().top(), 1);
        assert_eq!(at(&d), (0, 0));
        assert!(d.move_up(true).unwrap());
        assert!(!d.move_up(true).unwrap());
        assert_eq!(d.viewport().top(), 0);
    }

    #[test]
    fn ctrl_down_keeps_desired_col() {
        let mut d = doc(&["abcdef", "x"]);
        d.place(0, 4);
        d.move_down(true).unwrap();
        assert_eq!(d.cursor().desired_col, 4);
    }

    #[test]
    fn right_wrap_follows_viewport() {
        let mut d = doc(&["a", "b", "c"]);
        d.viewport_mut().recompute(1, 0, 1, 3);
        d.move_right(false).unwrap();
        assert_eq!(d.pos().line, 1);
        assert!(d.viewport().contains(1));
    }

    // -- invariants ---------------------------------------------------------

    #[test]
    fn cursor_off_buffer_is_an_error() {
        let mut d = doc(&["abc"]);
        d.place(5, 0);
        assert!(matches!(d.move_right(false), Err(EditorError::IndexOutOfRange { .. })));
        d.place(0, 9);
        assert!(d.move_left(false).is_err());
    }
}
