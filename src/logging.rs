use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Filter applied when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "grade_book=info";

/// Install the global subscriber. Events go to the log file in the data
/// directory because stdout and stdin belong to the interactive menu.
pub fn init_tracing(config: &Config) -> Result<()> {
    config.ensure_data_dir()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("failed to open log file")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
