//! Reading and writing documents.
//!
//! The core never touches the filesystem directly; it goes through a
//! [`Persistence`] so tests can swap in a store that fails on demand.
//! [`FsPersistence`] is the real one.
//!
//! On load every line is right-trimmed and tabs are expanded to spaces, so
//! the buffer never holds a `\t`. On save lines are joined with `\n` and the
//! last line is left unterminated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::error::{EditorError, Result};

/// Where document text comes from and goes to.
pub trait Persistence {
    /// Lines of the file at `path`, tabs expanded to `tab_width` spaces and
    /// trailing whitespace trimmed. A file that does not exist reads as zero
    /// lines.
    ///
    /// # Errors
    ///
    /// `Persistence` if the file exists but cannot be read.
    fn read_lines(&self, path: &Path, tab_width: usize) -> Result<Vec<String>>;

    /// Replace the file at `path` with `lines`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the file or its directory cannot be written.
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct FsPersistence;

impl Persistence for FsPersistence {
    fn read_lines(&self, path: &Path, tab_width: usize) -> Result<Vec<String>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EditorError::read(path, e)),
        };
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<String> = text.lines().map(|l| normalize_line(l, tab_width)).collect();
        debug!(path = %path.display(), lines = lines.len(), "read file");
        Ok(lines)
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| EditorError::write(path, e))?;
        }
        fs::write(path, lines.join("\n")).map_err(|e| EditorError::write(path, e))?;
        debug!(path = %path.display(), lines = lines.len(), "wrote file");
        Ok(())
    }
}

/// Right-trim `line` and expand each tab to `tab_width` spaces.
fn normalize_line(line: &str, tab_width: usize) -> String {
    let line = line.trim_end();
    if line.contains('\t') {
        line.replace('\t', &" ".repeat(tab_width))
    } else {
        line.to_owned()
    }
}

/// Create `path` as an empty file if nothing is there yet.
///
/// # Errors
///
/// `Persistence` if the file or its parent directory cannot be created.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    FsPersistence.write_lines(path, &[])
}

// ---------------------------------------------------------------------------
// Background load
// ---------------------------------------------------------------------------

/// A file load running on its own thread.
///
/// Nothing can see the lines until [`join`](Self::join) returns them, so a
/// document is never built from a half-read file.
#[derive(Debug)]
pub struct PendingLoad {
    path: PathBuf,
    handle: JoinHandle<Vec<String>>,
}

/// Start reading `path` in the background.
///
/// # Errors
///
/// Fails only if the OS refuses to start the thread.
pub fn spawn_load(path: PathBuf, tab_width: usize) -> io::Result<PendingLoad> {
    let target = path.clone();
    let handle = thread::Builder::new().name("ctext-load".into()).spawn(move || {
        FsPersistence.read_lines(&target, tab_width).unwrap_or_else(|e| {
            error!("{e}");
            Vec::new()
        })
    })?;
    Ok(PendingLoad { path, handle })
}

impl PendingLoad {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the load. A failed or panicked load yields zero lines.
    #[must_use]
    pub fn join(self) -> Vec<String> {
        self.handle.join().unwrap_or_else(|_| {
            error!(path = %self.path.display(), "loader thread panicked");
            Vec::new()
        })
    }
}
