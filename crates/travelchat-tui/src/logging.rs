use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use anyhow::Result;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Send tracing output to a log file; the terminal belongs to the TUI.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("travelchat");
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("travelchat.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(path)
}
