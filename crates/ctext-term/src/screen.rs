// SPDX-License-Identifier: MIT
//
// Screen — the cell grid an application paints each frame.
//
// Every cell holds one character and an opaque fg/bg pair. Translucent
// colors are composited against what is already in the cell at paint
// time, so later layers (a command bar over the text area) blend the way
// the configuration asks. Wide characters occupy their first cell and
// mark the following one as a continuation so columns stay aligned.
//
// Output is a full redraw inside a synchronized-update bracket, emitting
// SGR only when the style changes between adjacent cells.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::color::Rgba;
use crate::terminal::Size;

/// Foreground and background for painted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Rgba,
    pub bg: Rgba,
}

impl Style {
    #[inline]
    #[must_use]
    pub const fn new(fg: Rgba, bg: Rgba) -> Self {
        Self { fg, bg }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Rgba::WHITE, Rgba::BLACK)
    }
}

/// One screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// `None` for the trailing half of a wide character.
    pub ch: Option<char>,
    pub style: Style,
}

impl Cell {
    const fn blank(style: Style) -> Self {
        Self { ch: Some(' '), style }
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    size: Size,
    cells: Vec<Cell>,
}

impl Screen {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.cols) * usize::from(size.rows);
        Self { size, cells: vec![Cell::blank(Style::default()); len] }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.size.cols
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.size.rows
    }

    /// Resize and blank every cell.
    pub fn resize(&mut self, size: Size) {
        *self = Self::new(size);
    }

    /// Blank the whole grid with `style` (opaque colors expected).
    pub fn clear(&mut self, style: Style) {
        self.cells.fill(Cell::blank(style));
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.size.cols && row < self.size.rows)
            .then(|| usize::from(row) * usize::from(self.size.cols) + usize::from(col))
    }

    #[must_use]
    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Paint the background of a whole row, keeping its characters.
    pub fn fill_row(&mut self, row: u16, bg: Rgba) {
        for col in 0..self.size.cols {
            if let Some(i) = self.index(col, row) {
                let cell = &mut self.cells[i];
                cell.style.bg = bg.over(cell.style.bg);
                cell.style.fg = cell.style.fg.over(cell.style.bg);
            }
        }
    }

    /// Write `text` starting at `(col, row)`, clipped at the right edge.
    ///
    /// Returns the column just past the last cell written. Zero-width and
    /// control characters are skipped; a wide character that would not
    /// fit entirely is not drawn.
    pub fn put_str(&mut self, col: u16, row: u16, text: &str, style: Style) -> u16 {
        let mut x = col;
        for ch in text.chars() {
            let width = match ch.width() {
                Some(w) if w > 0 => w,
                _ => continue,
            };
            let Ok(width) = u16::try_from(width) else { continue };
            if x.saturating_add(width) > self.size.cols {
                break;
            }
            self.put_cell(x, row, Some(ch), style);
            for extra in 1..width {
                self.put_cell(x + extra, row, None, style);
            }
            x += width;
        }
        x
    }

    fn put_cell(&mut self, col: u16, row: u16, ch: Option<char>, style: Style) {
        if let Some(i) = self.index(col, row) {
            let below = self.cells[i].style.bg;
            let bg = style.bg.over(below);
            self.cells[i] = Cell { ch, style: Style::new(style.fg.over(bg), bg) };
        }
    }

    /// Characters of a row with trailing blanks trimmed.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        let text: String = (0..self.size.cols)
            .filter_map(|col| self.cell(col, row).and_then(|c| c.ch))
            .collect();
        text.trim_end().to_string()
    }

    /// Emit the whole grid.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        ansi::begin_sync(w)?;
        let mut current: Option<Style> = None;
        for row in 0..self.size.rows {
            ansi::cursor_to(w, 0, row)?;
            for col in 0..self.size.cols {
                let Some(cell) = self.cell(col, row) else { continue };
                let Some(ch) = cell.ch else { continue };
                if current != Some(cell.style) {
                    ansi::fg(w, cell.style.fg)?;
                    ansi::bg(w, cell.style.bg)?;
                    current = Some(cell.style);
                }
                let mut utf8 = [0u8; 4];
                w.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
            }
        }
        ansi::reset(w)?;
        ansi::end_sync(w)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn screen(cols: u16, rows: u16) -> Screen {
        Screen::new(Size { cols, rows })
    }

    #[test]
    fn put_str_returns_end_column() {
        let mut s = screen(10, 2);
        assert_eq!(s.put_str(2, 0, "abc", Style::default()), 5);
        assert_eq!(s.row_text(0), "  abc");
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut s = screen(4, 1);
        assert_eq!(s.put_str(1, 0, "abcdef", Style::default()), 4);
        assert_eq!(s.row_text(0), " abc");
    }

    #[test]
    fn wide_char_takes_two_cells() {
        let mut s = screen(6, 1);
        assert_eq!(s.put_str(0, 0, "漢a", Style::default()), 3);
        assert_eq!(s.cell(1, 0).unwrap().ch, None);
        assert_eq!(s.row_text(0), "漢a");
    }

    #[test]
    fn wide_char_not_split_at_edge() {
        let mut s = screen(3, 1);
        assert_eq!(s.put_str(0, 0, "a漢漢", Style::default()), 3);
        assert_eq!(s.row_text(0), "a漢");
    }

    #[test]
    fn out_of_bounds_rows_are_ignored() {
        let mut s = screen(3, 1);
        s.put_str(0, 5, "abc", Style::default());
        assert_eq!(s.row_text(0), "");
        assert!(s.cell(0, 5).is_none());
    }

    #[test]
    fn translucent_bg_composites_over_existing() {
        let mut s = screen(2, 1);
        s.clear(Style::new(Rgba::WHITE, Rgba::BLACK));
        let half_white = Rgba::new(255, 255, 255, 128);
        s.put_str(0, 0, "x", Style::new(Rgba::WHITE, half_white));
        assert_eq!(s.cell(0, 0).unwrap().style.bg, Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn fill_row_keeps_text() {
        let mut s = screen(3, 1);
        s.put_str(0, 0, "ab", Style::default());
        s.fill_row(0, Rgba::rgb(1, 2, 3));
        assert_eq!(s.row_text(0), "ab");
        assert_eq!(s.cell(2, 0).unwrap().style.bg, Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn write_to_emits_each_style_change_once() {
        let mut s = screen(3, 1);
        s.put_str(0, 0, "abc", Style::default());
        let mut out = Vec::new();
        s.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?2026h\x1b[1;1H"));
        assert!(text.contains("abc"));
        assert_eq!(text.matches("\x1b[38;2;").count(), 1);
        assert!(text.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn resize_blanks() {
        let mut s = screen(3, 1);
        s.put_str(0, 0, "abc", Style::default());
        s.resize(Size { cols: 5, rows: 2 });
        assert_eq!(s.size(), Size { cols: 5, rows: 2 });
        assert_eq!(s.row_text(0), "");
    }
}
