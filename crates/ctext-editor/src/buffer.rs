//! Text buffer — an ordered list of lines.
//!
//! Lines hold no terminators; the newline between two lines is implied. A
//! buffer always has at least one line, so an empty document is `[""]` and
//! `(0, 0)` is always a valid position.
//!
//! Every operation takes char columns and converts to byte offsets
//! internally. Positions outside the buffer are rejected with
//! [`EditorError::IndexOutOfRange`] rather than clamped: callers keep the
//! cursor legal, and a bad position here means that broke.

use crate::error::{EditorError, Result};
use crate::position::Position;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    modified: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A buffer holding a single empty line.
    #[must_use]
    pub fn new() -> Self {
        Self { lines: vec![String::new()], modified: false }
    }

    /// Build from loaded lines. Zero lines become one empty line.
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        if lines.is_empty() {
            return Self::new();
        }
        debug_assert!(lines.iter().all(|l| !l.contains('\n')), "lines carry no terminators");
        Self { lines, modified: false }
    }

    /// Build from text split on `\n`. Handy in tests.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(str::to_owned).collect())
    }

    // -- queries ------------------------------------------------------------

    /// Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text of line `y`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `y >= line_count()`.
    pub fn line(&self, y: usize) -> Result<&str> {
        self.lines
            .get(y)
            .map(String::as_str)
            .ok_or_else(|| EditorError::out_of_range(Position::new(y, 0), self.lines.len()))
    }

    /// Length of line `y` in chars.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `y >= line_count()`.
    pub fn line_len(&self, y: usize) -> Result<usize> {
        self.line(y).map(|l| l.chars().count())
    }

    /// The char at `pos`, or `None` past the end of the line or buffer.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line)?.chars().nth(pos.col)
    }

    /// The whole document, lines joined by `\n`, last line unterminated.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any edit happened since load or the last [`mark_saved`](Self::mark_saved).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    // -- edits --------------------------------------------------------------

    /// Insert `text` (no newlines) before column `pos.col`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the line is missing or `pos.col > line_len`.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Result<()> {
        debug_assert!(!text.contains('\n'), "insert_text takes a single line of text");
        let at = self.byte_at(pos)?;
        self.lines[pos.line].insert_str(at, text);
        self.modified |= !text.is_empty();
        Ok(())
    }

    /// Break line `pos.line` at `pos.col`; the tail becomes a new line below.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the line is missing or `pos.col > line_len`.
    pub fn split_line(&mut self, pos: Position) -> Result<()> {
        let at = self.byte_at(pos)?;
        let tail = self.lines[pos.line].split_off(at);
        self.lines.insert(pos.line + 1, tail);
        self.modified = true;
        Ok(())
    }

    /// Append line `y + 1` onto line `y` and remove it.
    ///
    /// Returns the char column where the two lines now meet.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `y + 1 >= line_count()`.
    pub fn join_line(&mut self, y: usize) -> Result<usize> {
        if y + 1 >= self.lines.len() {
            return Err(EditorError::out_of_range(Position::new(y + 1, 0), self.lines.len()));
        }
        let next = self.lines.remove(y + 1);
        let seam = self.lines[y].chars().count();
        self.lines[y].push_str(&next);
        self.modified = true;
        Ok(seam)
    }

    /// Remove `len` chars starting at `pos`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the line is missing or the range runs past
    /// the end of the line.
    pub fn erase_range(&mut self, pos: Position, len: usize) -> Result<()> {
        let start = self.byte_at(pos)?;
        let end = self.byte_at(Position::new(pos.line, pos.col + len))?;
        self.lines[pos.line].replace_range(start..end, "");
        self.modified |= len > 0;
        Ok(())
    }

    // -- helpers ------------------------------------------------------------

    /// Byte offset of char column `pos.col` in its line. `col == len` maps
    /// to the line's byte length.
    fn byte_at(&self, pos: Position) -> Result<usize> {
        let line = self.line(pos.line)?;
        line.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(pos.col)
            .ok_or_else(|| EditorError::out_of_range(pos, self.lines.len()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
