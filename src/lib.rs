pub mod config;
pub mod error;
pub mod flow_analyzer;
pub mod global_variables;
pub mod monitoring;
pub mod session;
pub mod shared_data;

pub use error::{ConfigError, PredictionError};
pub use flow_analyzer::PredictionEngine;
pub use shared_data::{CongestionLevel, PredictionResult, TripRequest, WeatherCondition};
