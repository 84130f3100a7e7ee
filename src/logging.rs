//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to
//! chanboard and HTTP request traces while sqlx is held at `warn`.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Normalize a configured level name, falling back to `info`.
fn normalize_level(level: &str) -> &'static str {
    let level = level.trim().to_ascii_lowercase();
    let level = if level == "warning" { "warn" } else { level.as_str() };
    LEVELS
        .iter()
        .copied()
        .find(|l| *l == level)
        .unwrap_or("info")
}

/// Filter directives used when `RUST_LOG` is not set.
fn default_directives(level: &str) -> String {
    let level = normalize_level(level);
    format!("{level},chanboard={level},tower_http={level},sqlx=warn")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Initialize logging to stdout and the configured log file.
///
/// An empty `file` logs to stdout only.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level);

    if config.file.trim().is_empty() {
        init_console_only(&config.level);
        return Ok(());
    }

    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(File::create(&config.file)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Initialize console-only logging.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .init();
}
