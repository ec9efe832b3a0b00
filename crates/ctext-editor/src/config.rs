//! INI configuration.
//!
//! ```ini
//! [file]
//! tab_size = 4
//! ```
//!
//! Built-in defaults ([`DEFAULT_CONFIG`]) are always parsed first and the
//! user's file is laid over them, so every key the editor reads has a
//! value unless the user's file sets it to something unusable.
//!
//! Lookups never fail. A missing or malformed value logs a warning and
//! yields the getter's fallback: `""`, [`i64::MIN`], `false`, or opaque
//! black.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ctext_term::color::Rgba;
use tracing::{debug, warn};

use crate::error::{EditorError, Result};

/// Used when `file.tab_size` is missing or below 1.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Settings every install starts from.
pub const DEFAULT_CONFIG: &str = "\
[window]
static_title = no

[file]
tab_size = 4
new_file_name = untitled.txt

[editor]
zero_indexing = no
relative_line_number = no
current_line_padding = yes
foreground = #c0caf5
alt_foreground = #565f89

[ui]
background = #1a1b26

[command]
background = #16161e
foreground = #c0caf5
";

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Typed lookups by `(section, key)`.
pub trait ConfigSource {
    /// The raw value, if the key is set.
    fn value(&self, section: &str, key: &str) -> Option<&str>;

    fn get_str(&self, section: &str, key: &str) -> String {
        self.value(section, key).map_or_else(
            || {
                warn!(section, key, "config key missing");
                String::new()
            },
            str::to_owned,
        )
    }

    /// [`i64::MIN`] when missing or not an integer.
    fn get_int(&self, section: &str, key: &str) -> i64 {
        let Some(raw) = self.value(section, key) else {
            warn!(section, key, "config key missing");
            return i64::MIN;
        };
        raw.parse().unwrap_or_else(|_| {
            warn!(section, key, value = raw, "config value is not an integer");
            i64::MIN
        })
    }

    /// `true` only for `yes`.
    fn get_bool(&self, section: &str, key: &str) -> bool {
        self.value(section, key).map_or_else(
            || {
                warn!(section, key, "config key missing");
                false
            },
            |v| v == "yes",
        )
    }

    /// A `#`-prefixed hex color. Opaque black when missing or malformed.
    fn get_color(&self, section: &str, key: &str) -> Rgba {
        let Some(raw) = self.value(section, key) else {
            warn!(section, key, "config key missing");
            return Rgba::BLACK;
        };
        parse_color(raw).unwrap_or_else(|| {
            warn!(section, key, value = raw, "config value is not a hex color");
            Rgba::BLACK
        })
    }
}

/// `file.tab_size`, or [`DEFAULT_TAB_WIDTH`] when unset or below 1.
#[must_use]
pub fn tab_width(config: &impl ConfigSource) -> usize {
    match usize::try_from(config.get_int("file", "tab_size")) {
        Ok(n) if n >= 1 => n,
        _ => DEFAULT_TAB_WIDTH,
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
///
/// Short forms scale each digit by 17, so `#f80` is `#ff8800`.
#[must_use]
pub fn parse_color(s: &str) -> Option<Rgba> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok().map(|n| n * 17);

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// IniConfig
// ---------------------------------------------------------------------------

/// Parsed INI data: section → key → value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniConfig {
    sections: HashMap<String, HashMap<String, String>>,
}

impl ConfigSource for IniConfig {
    fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }
}

impl IniConfig {
    /// Parse INI text.
    ///
    /// Blank lines and lines starting with `#` or `;` are skipped. Keys
    /// before the first `[section]` are dropped. A line without `=` that
    /// is not a section header is ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::default();
        let mut section: Option<String> = None;

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_owned());
                continue;
            }
            let (Some(sec), Some((key, value))) = (&section, line.split_once('=')) else {
                continue;
            };
            cfg.sections
                .entry(sec.clone())
                .or_default()
                .insert(key.trim().to_owned(), value.trim().to_owned());
        }
        cfg
    }

    /// The built-in settings.
    #[must_use]
    pub fn defaults() -> Self {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Read and parse one file.
    ///
    /// # Errors
    ///
    /// `Persistence` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| EditorError::read(path, e))?;
        debug!(path = %path.display(), "loaded config");
        Ok(Self::parse(&text))
    }

    /// Defaults overlaid with the user's file.
    ///
    /// With `explicit`, that file must be readable. Without it, the file at
    /// [`default_path`](Self::default_path) is used if it exists.
    ///
    /// # Errors
    ///
    /// `Persistence` if a file that should be read cannot be.
    pub fn load_user(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::defaults();
        match explicit {
            Some(path) => cfg.merge(Self::load(path)?),
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    cfg.merge(Self::load(&path)?);
                }
            }
        }
        Ok(cfg)
    }

    /// `$HOME/.config/ctext/config.ini` (`%USERPROFILE%` on Windows).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
        Some(PathBuf::from(home).join(".config").join("ctext").join("config.ini"))
    }

    /// Lay `other` over `self`; its keys win.
    pub fn merge(&mut self, other: Self) {
        for (name, keys) in other.sections {
            self.sections.entry(name).or_default().extend(keys);
        }
    }

    /// Set a single value.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections.entry(section.to_owned()).or_default().insert(key.to_owned(), value.into());
    }
}
