//! Document — one open file and everything positioned against it.
//!
//! The buffer, cursor, viewport and mode live together because every edit
//! and motion needs all four: the mode decides how far right the cursor
//! may go, and moving the cursor may scroll the viewport. Movement lives
//! in [`crate::movement`] and mutation in [`crate::edit`], both as methods
//! on `Document`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::mode::Mode;
use crate::position::Position;
use crate::viewport::Viewport;

#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: Buffer,
    pub(crate) cursor: Cursor,
    pub(crate) viewport: Viewport,
    pub(crate) mode: Mode,
    path: Option<PathBuf>,
}

impl Document {
    /// Open loaded lines in Normal mode with the cursor at the origin.
    #[must_use]
    pub fn new(lines: Vec<String>, path: Option<PathBuf>) -> Self {
        let buffer = Buffer::from_lines(lines);
        let viewport = Viewport::new(buffer.line_count());
        Self { buffer, cursor: Cursor::new(), viewport, mode: Mode::Normal, path }
    }

    /// An empty, unnamed document.
    #[must_use]
    pub fn scratch() -> Self {
        Self::new(Vec::new(), None)
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn pos(&self) -> Position {
        self.cursor.pos
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub const fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a successful write.
    pub fn mark_saved(&mut self) {
        self.buffer.mark_saved();
    }

    /// Switch mode and pull the cursor back inside the new mode's limit.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if the cursor is off the buffer.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "mode change");
            self.mode = mode;
        }
        self.cursor.clamp(&self.buffer, mode)?;
        Ok(())
    }

    /// Largest legal column on `line` for the current mode.
    pub(crate) fn max_col(&self, line: usize) -> Result<usize> {
        Ok(self.mode.max_col(self.buffer.line_len(line)?))
    }

    /// Chars of the cursor's line.
    pub(crate) fn current_chars(&self) -> Result<Vec<char>> {
        Ok(self.buffer.line(self.cursor.line())?.chars().collect())
    }

    /// Place the cursor directly. Test helper for building scenarios.
    #[cfg(test)]
    pub(crate) fn place(&mut self, line: usize, col: usize) {
        self.cursor = Cursor::at(Position::new(line, col));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::new(lines.iter().map(|s| (*s).to_string()).collect(), None)
    }

    #[test]
    fn empty_load_is_single_empty_line() {
        let d = Document::scratch();
        assert_eq!(d.buffer().lines(), &[String::new()]);
        assert_eq!(d.pos(), Position::ZERO);
        assert_eq!(d.mode(), Mode::Normal);
    }

    #[test]
    fn viewport_starts_at_line_count() {
        let d = doc(&["a", "b", "c"]);
        assert_eq!(d.viewport().last_line(), 3);
    }

    #[test]
    fn leaving_insert_clamps_column() {
        let mut d = doc(&["abc"]);
        d.set_mode(Mode::Insert).unwrap();
        d.place(0, 3);
        d.set_mode(Mode::Normal).unwrap();
        assert_eq!(d.pos(), Position::new(0, 2));
    }

    #[test]
    fn path_is_fixed_at_creation() {
        assert!(Document::scratch().path().is_none());
        let d = Document::new(vec!["a".into()], Some(PathBuf::from("notes.txt")));
        assert_eq!(d.path(), Some(Path::new("notes.txt")));
    }
}
