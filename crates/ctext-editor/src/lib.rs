//! # ctext-editor — editor core for ctext
//!
//! A modal, vi-like editing engine over a plain line buffer:
//!
//! - **[`buffer`]** — `Buffer`, an ordered list of lines that is never empty
//! - **[`position`]**, **[`cursor`]**, **[`viewport`]** — where the caret is and what is visible
//! - **[`mode`]** — `Normal`, `Insert`, `Command`, `Replace`, `Visual`
//! - **[`movement`]**, **[`edit`]** — cursor motion and text mutation on a [`document::Document`]
//! - **[`command`]** — the `:` line and its dispatcher (`w`, `q`, `wq`)
//! - **[`session`]** — the mode state machine that turns input events into the above
//! - **[`persist`]**, **[`config`]** — file I/O and INI settings
//! - **[`view`]** — paints a session onto a `ctext_term` screen
//!
//! Columns are `char` offsets everywhere; the terminal layer converts them to
//! display cells.

pub mod buffer;
pub mod command;
pub mod config;
pub mod cursor;
pub mod document;
pub mod edit;
pub mod error;
pub mod mode;
pub mod movement;
pub mod persist;
pub mod position;
pub mod session;
pub mod view;
pub mod viewport;
pub mod word;

pub use error::{EditorError, Result};
