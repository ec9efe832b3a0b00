//! Command-line mode: the `:` prompt on the bottom row.
//!
//! # Supported commands
//!
//! | Command | Action                     |
//! |---------|----------------------------|
//! | `:w`    | Save to the document path  |
//! | `:q`    | Quit                       |
//! | `:wq`   | Save, then quit if it worked |
//!
//! Anything else is accepted and does nothing. Commands are matched
//! verbatim: no arguments, no surrounding whitespace.
//!
//! # Architecture
//!
//! [`CommandLine`] is the text being typed, sentinel included. On Enter the
//! text after the sentinel is parsed into a [`Command`] and handed to
//! [`dispatch`], which runs it against the document.

use tracing::{debug, error};

use crate::document::Document;
use crate::error::{EditorError, Result};
use crate::persist::Persistence;
use crate::word::is_word_bound;

/// The first char of every command line.
pub const SENTINEL: char = ':';

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:w`
    Write,

    /// `:q`
    Quit,

    /// `:wq`
    WriteQuit,

    /// Anything else. Runs as a no-op.
    Unknown(String),
}

impl Command {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input {
            "w" => Self::Write,
            "q" => Self::Quit,
            "wq" => Self::WriteQuit,
            other => Self::Unknown(other.to_owned()),
        }
    }

    const fn writes(&self) -> bool {
        matches!(self, Self::Write | Self::WriteQuit)
    }

    const fn quits(&self) -> bool {
        matches!(self, Self::Quit | Self::WriteQuit)
    }
}

/// What the session should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Back to Normal mode. Carries a message for the status area.
    Continue(Option<String>),

    /// End the session.
    Quit,
}

/// Run `cmd` against `doc`, writing through `store`.
///
/// A failed write stops before any quit step.
///
/// # Errors
///
/// `NoFileName` if the document has no path, or `Persistence` if the
/// write fails.
pub fn dispatch(cmd: &Command, doc: &mut Document, store: &dyn Persistence) -> Result<Dispatch> {
    debug!(?cmd, "dispatch");
    let mut message = None;

    if cmd.writes() {
        let path = doc.path().ok_or(EditorError::NoFileName)?.to_path_buf();
        if let Err(e) = store.write_lines(&path, doc.buffer().lines()) {
            error!("{e}");
            return Err(e);
        }
        doc.mark_saved();
        message = Some(format!("\"{}\" {}L written", path.display(), doc.buffer().line_count()));
    }

    if cmd.quits() {
        return Ok(Dispatch::Quit);
    }
    Ok(Dispatch::Continue(message))
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer.
///
/// Always starts with [`SENTINEL`]; the cursor is a char column that never
/// moves onto it, so it is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    cursor: usize,
}

impl CommandLine {
    /// Just the sentinel, cursor after it.
    #[must_use]
    pub fn new() -> Self {
        Self { text: SENTINEL.to_string(), cursor: 1 }
    }

    /// The whole line, sentinel included. This is what gets painted.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The command text after the sentinel.
    #[must_use]
    pub fn committed(&self) -> &str {
        &self.text[SENTINEL.len_utf8()..]
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert `s` at the cursor and move past it.
    pub fn insert(&mut self, s: &str) {
        let at = self.byte_at(self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete before the cursor; never the sentinel.
    ///
    /// With `ctrl`, deletes the bound chars before the cursor and then the
    /// word before them. Returns `false` when the cursor is already right
    /// after the sentinel.
    pub fn backspace(&mut self, ctrl: bool) -> bool {
        if self.cursor <= 1 {
            return false;
        }
        let start = if ctrl {
            let chars: Vec<char> = self.text.chars().collect();
            let mut x = self.cursor;
            while x > 1 && is_word_bound(chars[x - 1]) {
                x -= 1;
            }
            while x > 1 && !is_word_bound(chars[x - 1]) {
                x -= 1;
            }
            x
        } else {
            self.cursor - 1
        };
        let (from, to) = (self.byte_at(start), self.byte_at(self.cursor));
        self.text.replace_range(from..to, "");
        self.cursor = start;
        true
    }

    /// Back to just the sentinel.
    pub fn clear(&mut self) {
        self.text.truncate(SENTINEL.len_utf8());
        self.cursor = 1;
    }

    /// Parse what follows the sentinel.
    #[must_use]
    pub fn parse(&self) -> Command {
        Command::parse(self.committed())
    }

    fn byte_at(&self, col: usize) -> usize {
        self.text.char_indices().nth(col).map_or(self.text.len(), |(i, _)| i)
    }
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
