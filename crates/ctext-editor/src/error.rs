//! Editor error type.
//!
//! Two things can go wrong inside the core: an operation is handed a
//! position the buffer does not have, or the filesystem refuses a read or
//! write (or there is nowhere to write to). Everything else (unknown commands, missing config keys) is a
//! soft failure handled where it happens.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

#[derive(Debug, Error)]
pub enum EditorError {
    /// A line or column outside the buffer. Indicates a broken invariant.
    #[error("position {pos} is outside the buffer ({line_count} lines)")]
    IndexOutOfRange { pos: Position, line_count: usize },

    /// A read or write against the filesystem failed.
    #[error("could not {action} {}: {source}", .path.display())]
    Persistence {
        action: IoAction,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `:w` on a document that was never given a path.
    #[error("no file name")]
    NoFileName,
}

/// Which side of persistence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
}

impl std::fmt::Display for IoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

impl EditorError {
    pub(crate) fn out_of_range(pos: Position, line_count: usize) -> Self {
        Self::IndexOutOfRange { pos, line_count }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence { action: IoAction::Read, path: path.into(), source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence { action: IoAction::Write, path: path.into(), source }
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
