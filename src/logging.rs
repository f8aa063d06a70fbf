// src/logging.rs

//! Optional logging setup using `tracing` + `tracing-subscriber`.
//!
//! The engine only emits `tracing` events; installing a subscriber is left to
//! the application. This helper is for binaries that have none of their own.
//!
//! Priority for determining the log level:
//! 1. the `level` argument (if provided)
//! 2. `TASKPOOL_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

/// Install a global fmt subscriber writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(level: Option<Level>) -> Result<()> {
    let level = level
        .or_else(|| {
            std::env::var("TASKPOOL_LOG")
                .ok()
                .and_then(|s| parse_level_str(&s))
        })
        .unwrap_or(Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
