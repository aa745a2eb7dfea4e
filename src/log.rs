// src/log.rs
//
// tracing subscriber setup. Lines are stamped with time since start
// (`[00:00:01.234]`), which is all a batch run needs.

use std::{
    fs::OpenOptions,
    path::Path,
    sync::{Mutex, OnceLock},
    time::Instant,
};

use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime, writer::BoxMakeWriter};

use crate::error::StoreError;

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Elapsed-time stamp for the fmt layer.
pub struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", fmt_elapsed(start().elapsed().as_millis()))
    }
}

/// Verbosity flags -> max level. `-q` wins over `-v`.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Install the global subscriber. Logs go to stderr, or are appended to
/// `log_file` when given. A second call is a no-op.
pub fn init(level: Level, log_file: Option<&Path>) -> Result<(), StoreError> {
    start();

    let (writer, ansi) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                crate::file::ensure_directory(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| StoreError::io(path, e))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(Elapsed)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init();
    Ok(())
}
