use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "minitodo.log";
const LOG_ENV_VAR: &str = "MINITODO_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Sends `tracing` output to `<data_dir>/minitodo.log`. The terminal belongs
/// to the UI, so nothing is logged to stdout/stderr.
pub fn init(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("could not create log directory {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("could not initialise logging: {e}"))
}
