use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::models::{GameError, Result};

/// Prefix for environment overrides, e.g. `GUESSING_GAME_DATA_DIR`.
pub const ENV_PREFIX: &str = "GUESSING_GAME";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Directory holding the high score file.
    pub data_dir: PathBuf,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub color: bool,
    /// Fixed seed for reproducible targets and hints.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Defaults layered under `source`.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg: AppConfig = Config::builder()
            .set_default("data_dir", "Data")?
            .set_default("log_filter", "warn")?
            .set_default("color", true)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(GameError::Configuration("data_dir must not be empty".into()));
        }
        Ok(())
    }
}
