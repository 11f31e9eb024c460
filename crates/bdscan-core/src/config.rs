use std::time::Duration;

use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Weigh stream files by their interleaved (SSIF) companion when present.
    pub enable_ssif: bool,
    pub progress_interval_ms: u64,
    /// Upper bound on how long the engine blocks waiting for a scan worker.
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_ssif: true,
            progress_interval_ms: 1000,
            poll_interval_ms: 250,
        }
    }
}

impl AppConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Reads an optional `Config.{toml,json,...}` file, then `BDSCAN_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("BDSCAN"))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}
