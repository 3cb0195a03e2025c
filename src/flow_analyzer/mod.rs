pub mod historical_data;
pub mod predictive_model;

// Re-export the items from predictive_model
pub use predictive_model::{
    checked_multiplier, confidence_from_unit, parse_departure_hour, recommendations,
    PredictionEngine,
};
