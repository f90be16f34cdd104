//! Runtime configuration (environment driven).

use std::path::PathBuf;

use anyhow::Context;
use eggman_observability::{LogFormat, LogSettings};

pub const DATA_DIR_VAR: &str = "EGGMAN_DATA_DIR";
pub const LOG_VAR: &str = "EGGMAN_LOG";
pub const LOG_FORMAT_VAR: &str = "EGGMAN_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the persisted inventory.
    pub data_dir: PathBuf,
    pub log: LogSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let defaults = LogSettings::default();

        let default_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_filter);

        let format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?,
            None => defaults.format,
        };

        Ok(Self {
            data_dir,
            log: LogSettings {
                default_filter,
                format,
            },
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("eggman"))
        .unwrap_or_else(|| PathBuf::from(".eggman"))
}
