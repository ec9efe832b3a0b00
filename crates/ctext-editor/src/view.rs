//! View — paints a [`Session`] onto a `ctext_term` [`Screen`].
//!
//! ```text
//!  ┌──────────────────────────────┐
//!  │   1 fn main() {              │  text rows: gutter + line text
//!  │ 2       body();              │  cursor line, number padded left
//!  │   3 }                        │
//!  │ ~                            │  past the end of the buffer
//!  │ NORMAL | main.rs        2:5  │  status row
//!  │ :wq                          │  command line or last message
//!  └──────────────────────────────┘
//! ```
//!
//! Every paint first recomputes the viewport's last visible line from the
//! number of text rows, so motion always scrolls against the current
//! window height. Columns are converted from chars to display cells here
//! and nowhere else.

use ctext_term::color::Rgba;
use ctext_term::screen::{Screen, Style};
use unicode_width::UnicodeWidthChar;

use crate::config::{ConfigSource, IniConfig};
use crate::mode::Mode;
use crate::session::Session;

/// Title used when `window.static_title` is set or there is no path.
pub const APP_TITLE: &str = "ctext";

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

/// Colors and gutter options, read once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub background: Rgba,
    pub foreground: Rgba,
    /// Line numbers other than the cursor's.
    pub alt_foreground: Rgba,
    pub command_background: Rgba,
    pub command_foreground: Rgba,
    pub zero_indexing: bool,
    pub relative_line_number: bool,
    /// Shift the cursor line's number two cells left.
    pub current_line_padding: bool,
    pub static_title: bool,
}

impl ViewConfig {
    #[must_use]
    pub fn from_config(cfg: &impl ConfigSource) -> Self {
        Self {
            background: cfg.get_color("ui", "background"),
            foreground: cfg.get_color("editor", "foreground"),
            alt_foreground: cfg.get_color("editor", "alt_foreground"),
            command_background: cfg.get_color("command", "background"),
            command_foreground: cfg.get_color("command", "foreground"),
            zero_indexing: cfg.get_bool("editor", "zero_indexing"),
            relative_line_number: cfg.get_bool("editor", "relative_line_number"),
            current_line_padding: cfg.get_bool("editor", "current_line_padding"),
            static_title: cfg.get_bool("window", "static_title"),
        }
    }

    const fn text_style(&self) -> Style {
        Style::new(self.foreground, self.background)
    }

    const fn command_style(&self) -> Style {
        Style::new(self.command_foreground, self.command_background)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::from_config(&IniConfig::defaults())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gutter columns for a buffer of `line_count` lines: the digits of the
/// count plus three.
///
/// | Lines   | Gutter |
/// |---------|--------|
/// | 1–9     | 4      |
/// | 10–99   | 5      |
/// | 100–999 | 6      |
#[must_use]
pub fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).ilog10() + 1;
    u16::try_from(digits + 3).unwrap_or(u16::MAX)
}

/// The gutter text for `line`, exactly [`gutter_width`] cells wide.
#[must_use]
pub fn line_number_label(line: usize, cursor_line: usize, line_count: usize, cfg: &ViewConfig) -> String {
    let current = line == cursor_line;
    let number = if cfg.relative_line_number && !current {
        line.abs_diff(cursor_line)
    } else if cfg.zero_indexing {
        line
    } else {
        line + 1
    };

    let width = usize::from(gutter_width(line_count));
    if current && cfg.current_line_padding {
        format!("{number:>w$}   ", w = width - 3)
    } else {
        format!("{number:>w$} ", w = width - 1)
    }
}

/// Display cells taken by the first `col` chars of `line`.
#[must_use]
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(|c| c.width().unwrap_or(0)).sum()
}

/// `line` with its first `left` display cells cut off. A wide char cut in
/// half shows as a space.
fn clip_left(line: &str, left: usize) -> String {
    let mut col = 0;
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if col >= left {
            out.push(ch);
        } else if col + w > left {
            out.push(' ');
        }
        col += w;
    }
    out
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Window title for the session.
#[must_use]
pub fn title(session: &Session, cfg: &ViewConfig) -> String {
    match session.document().path() {
        Some(path) if !cfg.static_title => format!("{} - {APP_TITLE}", path.display()),
        _ => APP_TITLE.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Paint the whole frame.
///
/// Returns the screen position of the cursor: on the command line in
/// Command mode, otherwise in the text area if its line is visible.
pub fn render(session: &mut Session, screen: &mut Screen, cfg: &ViewConfig) -> Option<(u16, u16)> {
    let (cols, rows) = (screen.cols(), screen.rows());
    if cols == 0 || rows == 0 {
        return None;
    }
    screen.clear(cfg.text_style());

    let text_rows = rows.saturating_sub(2);
    let mut cursor = render_text(session, screen, cfg, text_rows);

    if rows >= 2 {
        render_status(session, screen, cfg, rows - 2);
    }

    let bottom = rows - 1;
    screen.fill_row(bottom, cfg.command_background);
    if session.mode() == Mode::Command {
        let line = session.command_line();
        screen.put_str(0, bottom, line.text(), cfg.command_style());
        let x = display_col(line.text(), line.cursor());
        cursor = (x < usize::from(cols)).then(|| (to_u16(x), bottom));
    } else if let Some(msg) = session.message() {
        screen.put_str(0, bottom, msg, cfg.command_style());
    }

    cursor
}

fn render_text(session: &mut Session, screen: &mut Screen, cfg: &ViewConfig, text_rows: u16) -> Option<(u16, u16)> {
    let doc = session.document_mut();
    let line_count = doc.buffer().line_count();
    let pos = doc.pos();
    doc.viewport_mut().recompute(usize::from(text_rows), 0, 1, line_count);

    let gutter = gutter_width(line_count);
    let text_width = usize::from(screen.cols().saturating_sub(gutter));

    // Keep the cursor's display column inside the text area.
    let cursor_dc = doc.buffer().line(pos.line).map_or(0, |l| display_col(l, pos.col));
    if text_width > 0 {
        let scroll = &mut doc.viewport_mut().scroll;
        if cursor_dc < scroll.col {
            scroll.col = cursor_dc;
        } else if cursor_dc >= scroll.col + text_width {
            scroll.col = cursor_dc + 1 - text_width;
        }
    }

    let viewport = doc.viewport();
    let (top, left) = (viewport.top(), viewport.scroll.col);
    // Off screen after a wheel scroll.
    let cursor = (viewport.contains(pos.line) && text_width > 0)
        .then(|| (gutter + to_u16(cursor_dc - left), to_u16(pos.line - top)));

    for row in 0..text_rows {
        let line = top + usize::from(row);
        let Ok(text) = doc.buffer().line(line) else {
            screen.put_str(0, row, "~", Style::new(cfg.alt_foreground, cfg.background));
            continue;
        };

        let number_fg = if line == pos.line { cfg.foreground } else { cfg.alt_foreground };
        let label = line_number_label(line, pos.line, line_count, cfg);
        screen.put_str(0, row, &label, Style::new(number_fg, cfg.background));
        screen.put_str(gutter, row, &clip_left(text, left), cfg.text_style());
    }
    cursor
}

fn render_status(session: &Session, screen: &mut Screen, cfg: &ViewConfig, row: u16) {
    let doc = session.document();
    let name = doc
        .path()
        .and_then(|p| p.file_name())
        .map_or_else(|| "[No Name]".into(), |n| n.to_string_lossy());
    let modified = if doc.buffer().is_modified() { " [+]" } else { "" };
    let left = format!(" {} | {name}{modified}", doc.mode().display_name());
    let right = format!(" {} ", doc.pos());

    screen.fill_row(row, cfg.command_background);
    let right_start = screen.cols().saturating_sub(to_u16(right.chars().count()));
    let clipped: String = left.chars().take(usize::from(right_start)).collect();
    screen.put_str(0, row, &clipped, cfg.command_style());
    screen.put_str(right_start, row, &right, cfg.command_style());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
