//! The editing session: one document, the command line, and the mode state
//! machine that routes input events between them.
//!
//! | Mode    | Keys                                                       |
//! |---------|------------------------------------------------------------|
//! | any     | arrows (Ctrl for words / scrolling), Home, End             |
//! | Normal  | `h j k l`, `i`, `a`, `R`, `v`, `:`                         |
//! | Insert  | text, Return, Tab, Backspace (Ctrl for words), Escape      |
//! | Replace | as Insert, but typed text overwrites                       |
//! | Command | text, Backspace, Return runs the line, Escape cancels      |
//! | Visual  | `h j k l`, Escape                                          |
//!
//! Text reaches the document or command line only while text capture is
//! on, which is exactly while the mode takes input. Once `:q` or `:wq` has
//! ended the session every further event is ignored.

use ctext_term::event_loop::Action;
use ctext_term::input::{Event, KeyCode, KeyEvent, Wheel};
use tracing::{debug, error};

use crate::command::{self, CommandLine, Dispatch};
use crate::document::Document;
use crate::error::Result;
use crate::mode::Mode;
use crate::persist::Persistence;

pub struct Session {
    doc: Document,
    cmdline: CommandLine,
    capture: bool,
    terminated: bool,
    store: Box<dyn Persistence>,
    tab_width: usize,
    message: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(doc: Document, store: Box<dyn Persistence>, tab_width: usize) -> Self {
        Self {
            doc,
            cmdline: CommandLine::new(),
            capture: false,
            terminated: false,
            store,
            tab_width,
            message: None,
        }
    }

    // -- accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    #[inline]
    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[inline]
    #[must_use]
    pub const fn command_line(&self) -> &CommandLine {
        &self.cmdline
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.doc.mode
    }

    /// Last command result or error, shown when the command line is not.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether printable keys are currently taken as text.
    #[inline]
    #[must_use]
    pub const fn captures_text(&self) -> bool {
        self.capture
    }

    #[inline]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    // -- events -------------------------------------------------------------

    /// Feed one input event. Returns what the event loop should do next.
    pub fn handle_event(&mut self, event: &Event) -> Action {
        if self.terminated {
            return Action::Skip;
        }
        let outcome = match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Wheel(dir) => Ok(self.wheel(*dir)),
            Event::Paste(text) if self.capture => self.text_input(text),
            Event::Paste(_) => Ok(false),
        };
        match outcome {
            Ok(_) if self.terminated => Action::Quit,
            Ok(true) => Action::Redraw,
            Ok(false) => Action::Skip,
            Err(e) => {
                error!("{e}");
                self.message = Some(e.to_string());
                Action::Redraw
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.ctrl();
        match key.code {
            KeyCode::Right => return self.doc.move_right(ctrl),
            KeyCode::Left => return self.doc.move_left(ctrl),
            KeyCode::Down => return self.doc.move_down(ctrl),
            KeyCode::Up => return self.doc.move_up(ctrl),
            KeyCode::Home => return self.doc.move_home(),
            KeyCode::End => return self.doc.move_end(),
            _ => {}
        }

        match self.doc.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert | Mode::Replace => self.handle_insert(key),
            Mode::Command => self.handle_command(key),
            Mode::Visual => self.handle_visual(key),
        }
    }

    /// A printable char typed with no Ctrl or Alt, if any.
    fn typed_char(&self, key: KeyEvent) -> Option<char> {
        match key.code {
            KeyCode::Char(c) if self.capture && !key.ctrl() && !key.alt() => Some(c),
            _ => None,
        }
    }

    fn text_input(&mut self, text: &str) -> Result<bool> {
        if self.doc.mode == Mode::Command {
            // The command line is a single line.
            let line: String = text.chars().filter(|c| *c != '\n').collect();
            self.cmdline.insert(&line);
            return Ok(!line.is_empty());
        }
        self.doc.insert_text(text)
    }

    // -- normal -------------------------------------------------------------

    fn handle_normal(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.ctrl();
        if key.alt() {
            return Ok(false);
        }
        match key.code {
            KeyCode::Char('h') => self.doc.move_left(ctrl),
            KeyCode::Char('j') => self.doc.move_down(ctrl),
            KeyCode::Char('k') => self.doc.move_up(ctrl),
            KeyCode::Char('l') => self.doc.move_right(ctrl),
            _ if ctrl => Ok(false),

            KeyCode::Char('i') => self.enter_input(Mode::Insert),
            KeyCode::Char('a') => {
                let len = self.doc.buffer.line_len(self.doc.cursor.line())?;
                let col = self.doc.cursor.col();
                if col < len {
                    self.doc.cursor.set_col(col + 1);
                }
                self.enter_input(Mode::Insert)
            }
            KeyCode::Char('R') => self.enter_input(Mode::Replace),
            KeyCode::Char('v') => {
                self.doc.set_mode(Mode::Visual)?;
                Ok(true)
            }
            KeyCode::Char(':') => self.enter_command(),
            KeyCode::Char(';') if key.shift() => self.enter_command(),
            _ => Ok(false),
        }
    }

    fn enter_input(&mut self, mode: Mode) -> Result<bool> {
        self.doc.set_mode(mode)?;
        self.capture = true;
        self.message = None;
        Ok(true)
    }

    fn enter_command(&mut self) -> Result<bool> {
        self.cmdline.clear();
        self.enter_input(Mode::Command)
    }

    /// Back to Normal from any other mode.
    fn leave_to_normal(&mut self) -> Result<bool> {
        self.capture = false;
        self.doc.set_mode(Mode::Normal)?;
        Ok(true)
    }

    // -- insert / replace ---------------------------------------------------

    fn handle_insert(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Escape => {
                let col = self.doc.cursor.col();
                if col > 0 {
                    self.doc.cursor.set_col(col - 1);
                }
                self.leave_to_normal()
            }
            KeyCode::Backspace => self.doc.backspace(key.ctrl()),
            KeyCode::Enter => self.doc.split_line(),
            KeyCode::Tab => self.doc.insert_tab(self.tab_width),
            _ => match self.typed_char(key) {
                Some(c) => self.doc.insert_text(c.encode_utf8(&mut [0; 4])),
                None => Ok(false),
            },
        }
    }

    // -- command ------------------------------------------------------------

    fn handle_command(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Escape => {
                self.cmdline.clear();
                self.leave_to_normal()
            }
            KeyCode::Enter => self.commit_command(),
            KeyCode::Backspace => Ok(self.cmdline.backspace(key.ctrl())),
            _ => match self.typed_char(key) {
                Some(c) => {
                    self.cmdline.insert(c.encode_utf8(&mut [0; 4]));
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    /// Run the command line. A failed command keeps the line and the mode
    /// so it can be retried or cancelled.
    fn commit_command(&mut self) -> Result<bool> {
        let cmd = self.cmdline.parse();
        match command::dispatch(&cmd, &mut self.doc, self.store.as_ref()) {
            Ok(Dispatch::Quit) => {
                debug!("session terminated");
                self.terminated = true;
                self.capture = false;
                Ok(true)
            }
            Ok(Dispatch::Continue(message)) => {
                self.message = message;
                self.cmdline.clear();
                self.leave_to_normal()
            }
            Err(e) => {
                self.message = Some(e.to_string());
                Ok(true)
            }
        }
    }

    // -- visual -------------------------------------------------------------

    fn handle_visual(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.ctrl();
        match key.code {
            KeyCode::Escape => self.leave_to_normal(),
            KeyCode::Char('h') => self.doc.move_left(ctrl),
            KeyCode::Char('j') => self.doc.move_down(ctrl),
            KeyCode::Char('k') => self.doc.move_up(ctrl),
            KeyCode::Char('l') => self.doc.move_right(ctrl),
            _ => Ok(false),
        }
    }

    // -- mouse --------------------------------------------------------------

    /// Scroll the view a line without moving the cursor.
    fn wheel(&mut self, dir: Wheel) -> bool {
        let line_count = self.doc.buffer.line_count();
        match dir {
            Wheel::Up => self.doc.viewport.scroll_up(),
            Wheel::Down => self.doc.viewport.scroll_down(line_count),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use ctext_term::input::Modifiers;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::EditorError;
    use crate::position::Position;

    #[derive(Default)]
    struct Store {
        fail: bool,
        writes: Rc<RefCell<Vec<Vec<String>>>>,
    }

    impl Persistence for Store {
        fn read_lines(&self, _: &Path, _: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
            if self.fail {
                return Err(EditorError::write(path, io::Error::from(io::ErrorKind::PermissionDenied)));
            }
            self.writes.borrow_mut().push(lines.to_vec());
            Ok(())
        }
    }

    // -- helpers ------------------------------------------------------------

    fn session(lines: &[&str]) -> Session {
        session_with(lines, Store::default())
    }

    fn session_with(lines: &[&str], store: Store) -> Session {
        let doc = Document::new(
            lines.iter().map(|s| (*s).to_string()).collect(),
            Some(PathBuf::from("t.txt")),
        );
        Session::new(doc, Box::new(store), 4)
    }

    fn press(ch: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(ch)))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn ctrl(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, Modifiers::CTRL))
    }

    fn feed(s: &mut Session, events: &[Event]) -> Action {
        events.iter().fold(Action::Skip, |_, e| s.handle_event(e))
    }

    fn typed(s: &mut Session, text: &str) {
        for ch in text.chars() {
            s.handle_event(&press(ch));
        }
    }

    fn lines(s: &Session) -> Vec<&str> {
        s.document().buffer().lines().iter().map(String::as_str).collect()
    }

    fn at(s: &Session) -> (usize, usize) {
        let p = s.document().pos();
        (p.line, p.col)
    }

    // -- normal -------------------------------------------------------------

    #[test]
    fn starts_in_normal_without_capture() {
        let s = session(&["abc"]);
        assert_eq!(s.mode(), Mode::Normal);
        assert!(!s.captures_text());
    }

    #[test]
    fn normal_keys_are_not_text() {
        let mut s = session(&["abc"]);
        assert_eq!(s.handle_event(&press('x')), Action::Skip);
        assert_eq!(lines(&s), ["abc"]);
    }

    #[test]
    fn hjkl_move() {
        let mut s = session(&["abc", "def"]);
        feed(&mut s, &[press('l'), press('l'), press('j')]);
        assert_eq!(at(&s), (1, 2));
        feed(&mut s, &[press('h'), press('k')]);
        assert_eq!(at(&s), (0, 1));
    }

    #[test]
    fn i_enters_insert() {
        let mut s = session(&["abc"]);
        assert_eq!(s.handle_event(&press('i')), Action::Redraw);
        assert_eq!(s.mode(), Mode::Insert);
        assert!(s.captures_text());
        assert_eq!(at(&s), (0, 0));
    }

    #[test]
    fn a_appends_after_cursor() {
        let mut s = session(&["abc"]);
        s.handle_event(&press('a'));
        assert_eq!(at(&s), (0, 1));
        typed(&mut s, "X");
        assert_eq!(lines(&s), ["aXbc"]);
    }

    #[test]
    fn a_on_empty_line_stays_at_zero() {
        let mut s = session(&[""]);
        s.handle_event(&press('a'));
        assert_eq!(at(&s), (0, 0));
        assert_eq!(s.mode(), Mode::Insert);
    }

    #[test]
    fn a_at_last_char_reaches_end() {
        let mut s = session(&["abc"]);
        s.handle_event(&key(KeyCode::End));
        s.handle_event(&press('a'));
        assert_eq!(at(&s), (0, 3));
    }

    // -- insert -------------------------------------------------------------

    #[test]
    fn type_then_escape() {
        let mut s = session(&["abc"]);
        s.handle_event(&press('i'));
        typed(&mut s, "xy");
        assert_eq!(lines(&s), ["xyabc"]);
        assert_eq!(s.handle_event(&key(KeyCode::Escape)), Action::Redraw);
        assert_eq!(s.mode(), Mode::Normal);
        assert!(!s.captures_text());
        assert_eq!(at(&s), (0, 1));
    }

    #[test]
    fn escape_at_end_of_line_lands_on_last_char() {
        let mut s = session(&["ab"]);
        feed(&mut s, &[press('i'), key(KeyCode::End), key(KeyCode::Escape)]);
        assert_eq!(at(&s), (0, 1));
    }

    #[test]
    fn escape_at_col_zero_stays() {
        let mut s = session(&["ab"]);
        feed(&mut s, &[press('i'), key(KeyCode::Escape)]);
        assert_eq!(at(&s), (0, 0));
    }

    #[test]
    fn return_tab_and_backspace() {
        let mut s = session(&["ab"]);
        s.handle_event(&press('i'));
        s.handle_event(&key(KeyCode::Right));
        s.handle_event(&key(KeyCode::Enter));
        assert_eq!(lines(&s), ["a", "b"]);
        s.handle_event(&key(KeyCode::Tab));
        assert_eq!(lines(&s), ["a", "    b"]);
        assert_eq!(at(&s), (1, 4));
        s.handle_event(&ctrl(KeyCode::Backspace));
        assert_eq!(lines(&s), ["a", "b"]);
        s.handle_event(&ctrl(KeyCode::Backspace));
        assert_eq!(lines(&s), ["a", "b"]);
        assert_eq!(at(&s), (1, 0));
        s.handle_event(&key(KeyCode::Backspace));
        assert_eq!(lines(&s), ["ab"]);
        assert_eq!(at(&s), (0, 1));
    }

    #[test]
    fn ctrl_chars_are_not_text() {
        let mut s = session(&["ab"]);
        s.handle_event(&press('i'));
        assert_eq!(s.handle_event(&ctrl(KeyCode::Char('x'))), Action::Skip);
        assert_eq!(lines(&s), ["ab"]);
    }

    #[test]
    fn paste_goes_in_as_text() {
        let mut s = session(&["ab"]);
        s.handle_event(&Event::Paste("x\ny".into()));
        assert_eq!(lines(&s), ["ab"], "no capture in normal mode");
        s.handle_event(&press('i'));
        s.handle_event(&Event::Paste("x\ny".into()));
        assert_eq!(lines(&s), ["x", "yab"]);
        assert_eq!(at(&s), (1, 1));
    }

    #[test]
    fn backspace_in_normal_does_nothing() {
        let mut s = session(&["abc", "def"]);
        s.handle_event(&key(KeyCode::Down));
        assert_eq!(s.handle_event(&key(KeyCode::Backspace)), Action::Skip);
        assert_eq!(lines(&s), ["abc", "def"]);
    }

    // -- replace / visual ---------------------------------------------------

    #[test]
    fn replace_overwrites() {
        let mut s = session(&["abcd"]);
        feed(&mut s, &[press('R'), press('x'), press('y')]);
        assert_eq!(s.mode(), Mode::Replace);
        assert_eq!(lines(&s), ["xycd"]);
        s.handle_event(&key(KeyCode::Escape));
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(at(&s), (0, 1));
    }

    #[test]
    fn visual_moves_and_escapes() {
        let mut s = session(&["abc"]);
        feed(&mut s, &[press('v'), press('l'), press('x')]);
        assert_eq!(s.mode(), Mode::Visual);
        assert_eq!(lines(&s), ["abc"]);
        assert_eq!(at(&s), (0, 1));
        s.handle_event(&key(KeyCode::Escape));
        assert_eq!(s.mode(), Mode::Normal);
    }

    // -- command ------------------------------------------------------------

    #[test]
    fn colon_and_shifted_semicolon_enter_command() {
        let mut s = session(&["a"]);
        s.handle_event(&press(':'));
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line().text(), ":");
        s.handle_event(&key(KeyCode::Escape));

        s.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(';'), Modifiers::SHIFT)));
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn command_text_goes_to_command_line() {
        let mut s = session(&["a"]);
        s.handle_event(&press(':'));
        typed(&mut s, "set");
        assert_eq!(s.command_line().text(), ":set");
        assert_eq!(lines(&s), ["a"]);
        s.handle_event(&key(KeyCode::Backspace));
        assert_eq!(s.command_line().text(), ":se");
    }

    #[test]
    fn escape_cancels_command() {
        let mut s = session(&["a"]);
        s.handle_event(&press(':'));
        typed(&mut s, "wq");
        s.handle_event(&key(KeyCode::Escape));
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.command_line().text(), ":");
        assert!(!s.is_terminated());
    }

    #[test]
    fn write_returns_to_normal() {
        let store = Store::default();
        let writes = Rc::clone(&store.writes);
        let mut s = session_with(&["hello"], store);
        s.handle_event(&press(':'));
        typed(&mut s, "w");
        assert_eq!(s.handle_event(&key(KeyCode::Enter)), Action::Redraw);
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.command_line().text(), ":");
        assert_eq!(writes.borrow().as_slice(), &[vec!["hello".to_string()]]);
        assert!(s.message().is_some());
    }

    #[test]
    fn failed_write_stays_in_command_with_line() {
        let mut s = session_with(&["hello"], Store { fail: true, ..Store::default() });
        s.handle_event(&press(':'));
        typed(&mut s, "wq");
        assert_eq!(s.handle_event(&key(KeyCode::Enter)), Action::Redraw);
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line().text(), ":wq");
        assert!(!s.is_terminated());
        assert!(s.message().is_some_and(|m| m.contains("could not write")));
    }

    #[test]
    fn unknown_command_is_quiet() {
        let mut s = session(&["a"]);
        s.handle_event(&press(':'));
        typed(&mut s, "nope");
        s.handle_event(&key(KeyCode::Enter));
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.message(), None);
    }

    #[test]
    fn quit_fires_once_then_everything_is_ignored() {
        let mut s = session(&["a"]);
        s.handle_event(&press(':'));
        typed(&mut s, "q");
        assert_eq!(s.handle_event(&key(KeyCode::Enter)), Action::Quit);
        assert!(s.is_terminated());
        assert_eq!(s.handle_event(&key(KeyCode::Enter)), Action::Skip);
        assert_eq!(s.handle_event(&press('i')), Action::Skip);
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn arrows_in_command_mode_move_document_cursor() {
        let mut s = session(&["abc"]);
        s.handle_event(&press(':'));
        s.handle_event(&key(KeyCode::Right));
        assert_eq!(at(&s), (0, 1));
        assert_eq!(s.command_line().text(), ":");
    }

    // -- wheel --------------------------------------------------------------

    #[test]
    fn wheel_scrolls_without_moving_cursor() {
        let mut s = session(&["a", "b", "c"]);
        assert_eq!(s.handle_event(&Event::Wheel(Wheel::Up)), Action::Skip);
        assert_eq!(s.handle_event(&Event::Wheel(Wheel::Down)), Action::Redraw);
        s.handle_event(&Event::Wheel(Wheel::Down));
        assert_eq!(s.handle_event(&Event::Wheel(Wheel::Down)), Action::Skip);
        assert_eq!(s.document().viewport().top(), 2);
        assert_eq!(s.document().pos(), Position::ZERO);
    }
}
