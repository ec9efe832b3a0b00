// SPDX-License-Identifier: MIT
//
// ctext-term — the terminal side of ctext.
//
// Everything the editor core needs from a terminal and nothing more: raw
// mode with guaranteed restore, a byte decoder that turns stdin into key,
// wheel and paste events, a styled cell grid the editor paints into, and
// the event loop that ties them together. No TUI framework underneath;
// every escape sequence we emit lives in `ansi`.

pub mod ansi;
pub mod color;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod screen;
pub mod terminal;
