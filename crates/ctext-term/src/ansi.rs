// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Stateless writers over any `impl Write`. Coordinates are 0-indexed here
// and converted to the terminal's 1-indexed form on the way out.

use std::io::{self, Write};

use crate::color::Rgba;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Cursor shape (DECSCUSR). The editor picks one per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the user's terminal uses by default.
    #[default]
    Default,
    /// Steady block (Normal mode).
    Block,
    /// Steady underline (Replace mode).
    Underline,
    /// Steady bar (Insert and Command modes).
    Bar,
}

#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::Block => 2,
        CursorShape::Underline => 4,
        CursorShape::Bar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset every SGR attribute (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Hold output until [`end_sync`] (DEC 2026), so a frame lands at once.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

/// Set the window title (OSC 2).
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    // Control characters would terminate or corrupt the OSC string.
    let clean: String = title.chars().filter(|c| !c.is_control()).collect();
    write!(w, "\x1b]2;{clean}\x07")
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// 24-bit foreground. Alpha must already be composited away.
#[inline]
pub fn fg(w: &mut impl Write, c: Rgba) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

/// 24-bit background. Alpha must already be composited away.
#[inline]
pub fn bg(w: &mut impl Write, c: Rgba) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

// ─── Input Features ──────────────────────────────────────────────────────────

/// Report button and wheel events in SGR encoding (DEC 1000 + 1006).
#[inline]
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1000h\x1b[?1006h")
}

#[inline]
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1006l\x1b[?1000l")
}

/// Wrap pasted text in `CSI 200~` / `CSI 201~` (DEC 2004).
#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
