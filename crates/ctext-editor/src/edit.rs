//! Text mutation at the cursor.
//!
//! All edits go through [`Buffer`](crate::buffer::Buffer)'s checked
//! operations, then put the cursor where the edit leaves it and re-apply
//! the mode's column limit. Like motions, they return `Ok(changed)`.
//!
//! Replace mode overwrites: each typed char replaces the one under the
//! cursor, and appends once the cursor is past the end of the line.

use crate::document::Document;
use crate::mode::Mode;
use crate::position::Position;
use crate::word;
use crate::{EditorError, Result};

impl Document {
    /// Type `text` at the cursor. Only Insert, Replace and Command accept
    /// text; in any other mode this returns `Ok(false)`.
    ///
    /// A `\n` in `text` breaks the line as Return would.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn insert_text(&mut self, text: &str) -> Result<bool> {
        if !self.mode.is_input() || text.is_empty() {
            return Ok(false);
        }
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.split_line()?;
            }
            if self.mode == Mode::Replace {
                self.overwrite(segment)?;
            } else {
                self.buffer.insert_text(self.cursor.pos, segment)?;
                let col = self.cursor.col() + segment.chars().count();
                self.cursor.set_col(col);
            }
        }
        Ok(true)
    }

    fn overwrite(&mut self, text: &str) -> Result<()> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let pos = self.cursor.pos;
            if pos.col < self.buffer.line_len(pos.line)? {
                self.buffer.erase_range(pos, 1)?;
            }
            self.buffer.insert_text(pos, ch.encode_utf8(&mut buf))?;
            self.cursor.set_col(pos.col + 1);
        }
        Ok(())
    }

    /// `width` spaces at the cursor.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn insert_tab(&mut self, width: usize) -> Result<bool> {
        self.insert_text(&" ".repeat(width))
    }

    /// Return: break the line at the cursor and move to the start of the
    /// new line below.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn split_line(&mut self) -> Result<bool> {
        let pos = self.cursor.pos;
        self.buffer.split_line(pos)?;
        self.cursor.pos = Position::new(pos.line + 1, 0);
        self.cursor.desired_col = 0;
        self.viewport.follow_down(pos.line + 1);
        Ok(true)
    }

    /// Delete backwards from the cursor.
    ///
    /// At column 0 the line joins onto the one above and the cursor lands
    /// on the seam. With `ctrl`, deletes the bound chars before the cursor
    /// and then the word before them, stopping at column 0; it never joins.
    /// At `(0, 0)` nothing happens.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn backspace(&mut self, ctrl: bool) -> Result<bool> {
        let Position { line, col } = self.cursor.pos;
        // Validates the line before anything is touched.
        let len = self.buffer.line_len(line)?;
        if col > len {
            return Err(EditorError::out_of_range(self.cursor.pos, self.buffer.line_count()));
        }

        if ctrl {
            // Never crosses a line boundary.
            if col == 0 {
                return Ok(false);
            }
            let start = word::delete_back_start(&self.current_chars()?, col);
            self.buffer.erase_range(Position::new(line, start), col - start)?;
            self.cursor.set_col(start);
        } else if col == 0 {
            if line == 0 {
                return Ok(false);
            }
            let seam = self.buffer.join_line(line - 1)?;
            self.cursor.pos.line = line - 1;
            self.cursor.set_col(seam);
            self.viewport.follow_up(line - 1);
        } else {
            self.buffer.erase_range(Position::new(line, col - 1), 1)?;
            self.cursor.set_col(col - 1);
        }

        self.cursor.clamp(&self.buffer, self.mode)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
