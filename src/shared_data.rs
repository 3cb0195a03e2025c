// src/shared_data.rs

use crate::error::PredictionError;
use crate::global_variables::{HIGH_CONGESTION_VOLUME, MEDIUM_CONGESTION_VOLUME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Coarse three-bucket traffic classification. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// Buckets a predicted volume. Both thresholds are strict.
    pub fn from_volume(volume: i64) -> Self {
        if volume > HIGH_CONGESTION_VOLUME {
            CongestionLevel::High
        } else if volume > MEDIUM_CONGESTION_VOLUME {
            CongestionLevel::Medium
        } else {
            CongestionLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Medium => "Medium",
            CongestionLevel::High => "High",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of weather conditions the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Rain,
    Snow,
    Fog,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Clear,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Fog,
    ];

    /// Factor by which this weather inflates volume and deflates speed.
    pub fn multiplier(&self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.0,
            WeatherCondition::Rain => 1.3,
            WeatherCondition::Snow => 1.6,
            WeatherCondition::Fog => 1.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Fog => "Fog",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherCondition::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| PredictionError::InvalidWeatherCondition(s.to_string()))
    }
}

/// One fixed hourly record of historical traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyTrafficSample {
    pub hour: u32,
    pub volume: u32,
    pub speed: u32,
    pub congestion: CongestionLevel,
}

impl HourlyTrafficSample {
    /// "HH:00" label used on chart axes.
    pub fn time_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// What the trip form submits. Locations are collected but not used by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub start_location: String,
    pub end_location: String,
    pub departure_time: Option<String>,
    pub weather_condition: String,
}

impl TripRequest {
    pub fn new(departure_time: Option<&str>, weather_condition: &str) -> Self {
        Self {
            start_location: String::new(),
            end_location: String::new(),
            departure_time: departure_time.map(str::to_string),
            weather_condition: weather_condition.to_string(),
        }
    }
}

/// A synthetic forecast. Produced fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub departure_hour: u32,
    pub weather: WeatherCondition,
    pub predicted_volume: i64,
    pub predicted_speed: i64,
    pub estimated_minutes: i64,
    pub congestion_level: CongestionLevel,
    pub confidence_percent: u32,
    pub weather_delay_percent: i64,
    pub recommendations: [String; 3],
}

/// One card on the route optimization tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteOption {
    pub route: &'static str,
    pub distance: &'static str,
    pub time: &'static str,
    pub traffic: CongestionLevel,
    pub fuel: &'static str,
}

/// Figures shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentStats {
    pub average_speed: u32,
    pub congestion_level: u32,
    pub active_vehicles: u32,
    pub weather_impact: u32,
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
