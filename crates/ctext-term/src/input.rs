// SPDX-License-Identifier: MIT
//
// Stdin byte decoder.
//
// Turns the raw byte stream of a terminal in raw mode into the handful of
// events the editor understands:
//
// - printable characters (ASCII and UTF-8) and the named editing keys
// - xterm-style CSI/SS3 cursor keys with their modifier parameter
//   (`ESC [ 1 ; 5 C` is Ctrl+Right)
// - Ctrl+letter and Alt+key
// - SGR mouse wheel reports (`ESC [ < 64 ; x ; y M`)
// - bracketed paste, delivered as one `Event::Paste`
//
// Sequences may be split across reads, so the decoder keeps a pending
// buffer. A lone ESC stays pending until the event loop times out and
// calls [`Decoder::flush`], which resolves it to the Escape key.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// One notch of the mouse wheel.
    Wheel(Wheel),
    /// Bracketed paste content, line endings normalized to `\n`.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Up,
    Down,
}

/// A key press together with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    #[inline]
    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[inline]
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    #[inline]
    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Held modifier keys.
    ///
    /// Bit layout follows the xterm parameter encoding, where the number
    /// on the wire is `1 + bits`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Incremental stdin decoder.
#[derive(Debug, Default)]
pub struct Decoder {
    pending: Vec<u8>,
    pasting: bool,
}

/// Outcome of decoding at the front of the pending buffer.
enum Step {
    /// Consume `usize` bytes, emitting the event if there is one.
    Take(Option<Event>, usize),
    /// The bytes so far are a valid prefix; wait for more.
    NeedMore,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and decode as many events as are complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut at = 0;

        while at < self.pending.len() {
            let rest = &self.pending[at..];

            if self.pasting {
                let Some(end) = find(rest, PASTE_END) else { break };
                let text = String::from_utf8_lossy(&rest[..end]);
                events.push(Event::Paste(normalize_newlines(&text)));
                at += end + PASTE_END.len();
                self.pasting = false;
                continue;
            }

            if rest.starts_with(PASTE_START) {
                self.pasting = true;
                at += PASTE_START.len();
                continue;
            }

            match step(rest) {
                Step::Take(event, n) => {
                    events.extend(event);
                    at += n;
                }
                Step::NeedMore => break,
            }
        }

        self.pending.drain(..at);
        events
    }

    /// Whether a timeout should resolve leftover bytes via [`flush`](Self::flush).
    ///
    /// An unterminated paste is never flushed; its closing delimiter is
    /// still on the way.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pasting && !self.pending.is_empty()
    }

    /// Resolve leftover bytes after an input timeout.
    ///
    /// A lone ESC becomes the Escape key; stray printable bytes become
    /// characters; anything else is dropped.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .pending
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(Event::Key(KeyEvent::plain(KeyCode::Escape))),
                0x20..=0x7E => Some(Event::Key(KeyEvent::plain(KeyCode::Char(b as char)))),
                _ => None,
            })
            .collect();
        self.pending.clear();
        events
    }
}

// ─── Sequence Decoding ──────────────────────────────────────────────────────

fn key(code: KeyCode, modifiers: Modifiers) -> Option<Event> {
    Some(Event::Key(KeyEvent::new(code, modifiers)))
}

fn step(bytes: &[u8]) -> Step {
    let none = Modifiers::empty();
    match bytes[0] {
        0x1B => escape(bytes),
        0x7F => Step::Take(key(KeyCode::Backspace, none), 1),
        // Most terminals send ^H for Ctrl+Backspace.
        0x08 => Step::Take(key(KeyCode::Backspace, Modifiers::CTRL), 1),
        0x09 => Step::Take(key(KeyCode::Tab, none), 1),
        0x0A | 0x0D => Step::Take(key(KeyCode::Enter, none), 1),
        0x00 => Step::Take(key(KeyCode::Char(' '), Modifiers::CTRL), 1),
        b @ 0x01..=0x1A => Step::Take(key(KeyCode::Char((b - 1 + b'a') as char), Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Step::Take(key(KeyCode::Char(b as char), none), 1),
        0x80..=0xFF => utf8(bytes),
        _ => Step::Take(None, 1),
    }
}

fn escape(bytes: &[u8]) -> Step {
    let Some(&second) = bytes.get(1) else {
        return Step::NeedMore;
    };
    match second {
        b'[' => csi(bytes),
        b'O' => ss3(bytes),
        0x7F => Step::Take(key(KeyCode::Backspace, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Step::Take(key(KeyCode::Char(b as char), Modifiers::ALT), 2),
        _ => Step::Take(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

fn csi(bytes: &[u8]) -> Step {
    if bytes.get(2) == Some(&b'<') {
        return sgr_mouse(bytes);
    }

    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    let mut end = 2;
    loop {
        match bytes.get(end) {
            None => return Step::NeedMore,
            Some(0x40..=0x7E) => break,
            Some(0x20..=0x3F) => end += 1,
            Some(_) => return Step::Take(None, end),
        }
    }

    let params = numbers(&bytes[2..end]);
    let modifiers = params.get(1).copied().map_or(Modifiers::empty(), decode_modifiers);
    let consumed = end + 1;

    let code = match bytes[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => return Step::Take(key(KeyCode::Tab, Modifiers::SHIFT), consumed),
        b'~' => match params.first() {
            Some(1 | 7) => KeyCode::Home,
            Some(3) => KeyCode::Delete,
            Some(4 | 8) => KeyCode::End,
            Some(5) => KeyCode::PageUp,
            Some(6) => KeyCode::PageDown,
            _ => return Step::Take(None, consumed),
        },
        _ => return Step::Take(None, consumed),
    };
    Step::Take(key(code, modifiers), consumed)
}

fn ss3(bytes: &[u8]) -> Step {
    let Some(&last) = bytes.get(2) else {
        return Step::NeedMore;
    };
    let code = match last {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Step::Take(None, 3),
    };
    Step::Take(key(code, Modifiers::empty()), 3)
}

/// `ESC [ < button ; x ; y (M|m)`. Only wheel notches produce events.
fn sgr_mouse(bytes: &[u8]) -> Step {
    let mut end = 3;
    loop {
        match bytes.get(end) {
            None => return Step::NeedMore,
            Some(b'M' | b'm') => break,
            Some(b) if b.is_ascii_digit() || *b == b';' => end += 1,
            Some(_) => return Step::Take(None, end + 1),
        }
    }

    let button = numbers(&bytes[3..end]).first().copied().unwrap_or(0);
    let pressed = bytes[end] == b'M';
    let event = if pressed && button & 64 != 0 {
        match button & 3 {
            0 => Some(Event::Wheel(Wheel::Up)),
            1 => Some(Event::Wheel(Wheel::Down)),
            _ => None,
        }
    } else {
        None
    };
    Step::Take(event, end + 1)
}

fn utf8(bytes: &[u8]) -> Step {
    let len = match bytes[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Step::Take(None, 1),
    };
    if bytes.len() < len {
        return Step::NeedMore;
    }
    match std::str::from_utf8(&bytes[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) => Step::Take(key(KeyCode::Char(c), Modifiers::empty()), len),
        None => Step::Take(None, 1),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Semicolon-separated decimal parameters. Empty fields read as 0.
fn numbers(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// xterm modifier parameter: `1 + bits`.
fn decode_modifiers(param: u16) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1)).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ─── Tests ──────────────────────────────────────────────────────────────────
