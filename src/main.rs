// SPDX-License-Identifier: MIT
//
// ctext — a small modal text editor for the terminal.
//
// This binary is wiring only: parse arguments, set up logging, load the
// configuration, read the file on a background thread, and hand a
// `Session` to the terminal event loop. All editing behavior lives in
// `ctext-editor`; all terminal handling lives in `ctext-term`.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ctext_editor::config::{self, ConfigSource, IniConfig};
use ctext_editor::document::Document;
use ctext_editor::persist::{self, FsPersistence};
use ctext_editor::session::Session;
use ctext_editor::view::{self, ViewConfig};
use ctext_term::ansi::CursorShape;
use ctext_term::event_loop::{Action, App, EventLoop};
use ctext_term::input::Event;
use ctext_term::screen::Screen;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Opened when neither the arguments nor the config name a file.
const FALLBACK_FILE_NAME: &str = "untitled.txt";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "ctext", about = "A small modal text editor", version, disable_version_flag = true)]
struct Args {
    /// File to edit. Created if it does not exist.
    file: Option<PathBuf>,

    /// File to edit; takes precedence over FILE.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file_flag: Option<PathBuf>,

    /// Configuration file [default: ~/.config/ctext/config.ini]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    debug: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    _version: Option<bool>,
}

impl Args {
    /// `-f`, then the positional file, then `file.new_file_name`.
    fn target(&self, cfg: &impl ConfigSource) -> PathBuf {
        if let Some(path) = self.file_flag.as_ref().or(self.file.as_ref()) {
            return path.clone();
        }
        let name = cfg.get_str("file", "new_file_name");
        PathBuf::from(if name.is_empty() { FALLBACK_FILE_NAME } else { name.as_str() })
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// The terminal belongs to the editor, so logs go to a file.
fn log_path() -> PathBuf {
    std::env::temp_dir().join("ctext.log")
}

fn init_logging(debug: bool) -> Result<()> {
    let path = log_path();
    let file = File::create(&path).with_context(|| format!("cannot create log file {}", path.display()))?;
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .init();
    Ok(())
}

// ─── Editor ─────────────────────────────────────────────────────────────────

struct Editor {
    session: Session,
    view: ViewConfig,
    cursor: Option<(u16, u16)>,
}

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        self.session.handle_event(event)
    }

    fn paint(&mut self, screen: &mut Screen) {
        self.cursor = view::render(&mut self.session, screen, &self.view);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.cursor?;
        Some((x, y, self.session.mode().cursor_shape()))
    }

    fn title(&self) -> Option<String> {
        Some(view::title(&self.session, &self.view))
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<()> {
    init_logging(args.debug)?;

    let cfg = IniConfig::load_user(args.config.as_deref()).context("cannot load configuration")?;
    let path = args.target(&cfg);
    persist::ensure_exists(&path).with_context(|| format!("cannot open {}", path.display()))?;

    let tab_width = config::tab_width(&cfg);
    let pending = persist::spawn_load(path.clone(), tab_width).context("cannot start file load")?;
    debug!(path = %pending.path().display(), "loading in background");
    let view = ViewConfig::from_config(&cfg);
    let mut event_loop = EventLoop::new();

    let lines = pending.join();
    info!(path = %path.display(), lines = lines.len(), "opened");

    let doc = Document::new(lines, Some(path));
    let mut editor = Editor { session: Session::new(doc, Box::new(FsPersistence), tab_width), view, cursor: None };
    event_loop.run(&mut editor).context("terminal error")?;

    info!("exit");
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("ctext: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
