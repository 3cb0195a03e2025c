use crate::error::ConfigError;
use crate::global_variables::{
    CONFIG_ENV_VAR, DEFAULT_LOADING_DELAY_MS, DEFAULT_PREDICTION_LOG, MAX_LOADING_DELAY_MS,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings for the dashboard shell. Every field has a default, so a
/// config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub loading_delay_ms: u64,
    pub prediction_log_path: PathBuf,
    pub chart_dir: PathBuf,
    pub log_predictions: bool,
    pub rng_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: DEFAULT_LOADING_DELAY_MS,
            prediction_log_path: PathBuf::from(DEFAULT_PREDICTION_LOG),
            chart_dir: PathBuf::from("."),
            log_predictions: true,
            rng_seed: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file named by `TRAFFIC_DASHBOARD_CONFIG`, or falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::info!("Loading dashboard config from {:?}", path);
                Self::load(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loading_delay_ms > MAX_LOADING_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "loading_delay_ms must be at most {}, got {}",
                MAX_LOADING_DELAY_MS, self.loading_delay_ms
            )));
        }
        if self.prediction_log_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "prediction_log_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }
}
