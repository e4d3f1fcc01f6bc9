use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Which view the terminal UI opens in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    #[default]
    Full,
    Mini,
}

/// User preferences read from `<data_dir>/config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Ring the terminal bell when a task is completed.
    pub bell: bool,
    pub start_mode: StartMode,
    /// Whether the completed section starts expanded.
    pub show_completed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bell: true,
            start_mode: StartMode::Full,
            show_completed: true,
        }
    }
}

impl Config {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads the config file from `data_dir`. A missing file gives the
    /// defaults; an unreadable or invalid one gives the defaults plus a warning.
    pub fn load(data_dir: &Path) -> (Self, Option<String>) {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return (Self::default(), None);
        }

        let result = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))
            .and_then(|raw| {
                Self::parse(&raw).with_context(|| format!("could not parse {}", path.display()))
            });

        match result {
            Ok(config) => (config, None),
            Err(e) => {
                let message = format!("{e:#}; using default settings");
                warn!(target: "config", "{}", message);
                (Self::default(), Some(message))
            }
        }
    }
}
