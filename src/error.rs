use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("invalid weather condition '{0}' (expected Clear, Rain, Snow or Fog)")]
    InvalidWeatherCondition(String),
    #[error("departure hour {0} is outside 0-23")]
    InvalidHour(u32),
    #[error("weather multiplier must be finite and positive, got {0}")]
    InvalidMultiplier(f64),
    #[error("predicted speed rounded to zero for hour {hour}")]
    ZeroPredictedSpeed { hour: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
