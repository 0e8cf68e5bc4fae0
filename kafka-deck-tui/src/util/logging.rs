//! File logging
//!
//! Stdout belongs to the terminal UI, so every record goes to
//! `<config dir>/kafka-deck/kafka-deck.log` through a non-blocking writer. `log`
//! records from the core crate are bridged into the same subscriber.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "kafka-deck.log";

/// Install the global subscriber. Keep the guard alive until exit so buffered lines flush.
pub fn init_logging(dir: &Path, filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{filter}' ({e}), using info");
        EnvFilter::new("info")
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
