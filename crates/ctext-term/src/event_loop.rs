// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// Bytes arrive from the stdin reader thread, the decoder turns them into
// events, the application handles each one and says whether the frame
// needs repainting. The loop blocks on `recv_timeout`, so it costs nothing
// while idle; the timeout doubles as the ESC disambiguation delay.
//
// Terminal resize is picked up through a SIGWINCH handler that raises an
// atomic flag checked once per iteration.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::input::{Decoder, Event};
use crate::reader::StdinReader;
use crate::screen::Screen;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static RESIZED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = on_sigwinch as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App ─────────────────────────────────────────────────────────────────────

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing visible changed.
    Skip,
    /// State changed; repaint before waiting for more input.
    Redraw,
    /// Leave the loop.
    Quit,
}

/// An application driven by [`EventLoop`].
pub trait App {
    fn on_event(&mut self, event: &Event) -> Action;

    /// The terminal changed size. A repaint follows unconditionally.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole frame.
    fn paint(&mut self, screen: &mut Screen);

    /// Where to show the hardware cursor after painting, if anywhere.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }

    /// Window title, set once when the loop starts.
    fn title(&self) -> Option<String> {
        None
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Timeout for `recv_timeout`: 120 wakeups a second at most, and the
/// longest a lone ESC waits before it is taken as the Escape key.
const TICK: Duration = Duration::from_micros(8333);

pub struct EventLoop {
    terminal: Terminal,
    decoder: Decoder,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self { terminal: Terminal::new(), decoder: Decoder::new() }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application returns [`Action::Quit`] or stdin closes.
    ///
    /// The terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if entering/leaving the terminal or writing a frame fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let r = self.pump(app, &rx);
            reader.stop();
            r
        });

        self.terminal.leave()?;
        result
    }

    fn pump(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let mut screen = Screen::new(self.terminal.size());
        app.on_resize(screen.size());

        if let Some(title) = app.title() {
            let mut out = io::stdout().lock();
            ansi::set_title(&mut out, &title)?;
            out.flush()?;
        }

        let mut dirty = true;
        loop {
            let events = match rx.recv_timeout(TICK) {
                Ok(bytes) => self.decoder.feed(&bytes),
                Err(RecvTimeoutError::Timeout) if self.decoder.has_pending() => self.decoder.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };

            for event in &events {
                match app.on_event(event) {
                    Action::Quit => return Ok(()),
                    Action::Redraw => dirty = true,
                    Action::Skip => {}
                }
            }

            if RESIZED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                screen.resize(size);
                app.on_resize(size);
                dirty = true;
            }

            if dirty {
                present(app, &mut screen)?;
                dirty = false;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Paint a frame and place the cursor.
fn present(app: &mut impl App, screen: &mut Screen) -> io::Result<()> {
    app.paint(screen);

    let mut out = io::BufWriter::new(io::stdout().lock());
    ansi::cursor_hide(&mut out)?;
    screen.write_to(&mut out)?;
    if let Some((x, y, shape)) = app.cursor() {
        ansi::cursor_to(&mut out, x, y)?;
        ansi::set_cursor_shape(&mut out, shape)?;
        ansi::cursor_show(&mut out)?;
    }
    out.flush()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
