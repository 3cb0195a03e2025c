use chrono::{NaiveDateTime, NaiveTime, Timelike};
use rand::Rng;

use crate::error::PredictionError;
use crate::flow_analyzer::historical_data::{fallback_sample, HOURLY_SAMPLES};
use crate::global_variables::{
    CONFIDENCE_BASE, CONFIDENCE_SPAN, DATETIME_FORMATS, HIGH_CONGESTION_VOLUME,
    PEAK_MORNING_HOURS, ROUTE_DISTANCE_KM, TIME_ONLY_FORMAT, WEATHER_ADVICE_MULTIPLIER,
};
use crate::shared_data::{
    CongestionLevel, HourlyTrafficSample, PredictionResult, TripRequest, WeatherCondition,
};

/// Derives a synthetic forecast from the hourly table and a weather multiplier.
///
/// Holds only read-only data, so one engine can be shared freely between tasks.
/// The random source for the confidence score is passed in on every call.
#[derive(Debug, Clone, Copy)]
pub struct PredictionEngine {
    samples: &'static [HourlyTrafficSample],
    route_distance_km: f64,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionEngine {
    pub fn new() -> Self {
        Self {
            samples: &HOURLY_SAMPLES,
            route_distance_km: ROUTE_DISTANCE_KM,
        }
    }

    pub fn samples(&self) -> &'static [HourlyTrafficSample] {
        self.samples
    }

    /// Predict traffic for a submitted trip form.
    ///
    /// The weather is validated before anything else. A missing or unreadable
    /// departure time is not an error: it resolves to the 14:00 sample.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        request: &TripRequest,
        rng: &mut R,
    ) -> Result<PredictionResult, PredictionError> {
        let weather: WeatherCondition = request.weather_condition.parse()?;
        let hour = match parse_departure_hour(request.departure_time.as_deref()) {
            Some(hour) => hour,
            None => {
                log::warn!(
                    "[Prediction] Departure time {:?} not usable, assuming {}",
                    request.departure_time,
                    fallback_sample().time_label()
                );
                fallback_sample().hour
            }
        };
        self.predict_for(hour, weather, rng)
    }

    /// Predict traffic for an already-extracted hour in 0..=23.
    pub fn predict_for<R: Rng + ?Sized>(
        &self,
        hour: u32,
        weather: WeatherCondition,
        rng: &mut R,
    ) -> Result<PredictionResult, PredictionError> {
        if hour > 23 {
            return Err(PredictionError::InvalidHour(hour));
        }
        let sample = self.sample_for(hour);
        let multiplier = checked_multiplier(weather.multiplier())?;

        let predicted_volume = round_half_even(sample.volume as f64 * multiplier);
        let predicted_speed = round_half_even(sample.speed as f64 / multiplier);
        if predicted_speed <= 0 {
            return Err(PredictionError::ZeroPredictedSpeed { hour });
        }
        let estimated_minutes =
            round_half_even((self.route_distance_km / predicted_speed as f64) * 60.0);
        let congestion_level = CongestionLevel::from_volume(predicted_volume);
        let confidence_percent = confidence_from_unit(rng.random::<f64>());
        let weather_delay_percent = round_half_even((multiplier - 1.0) * 100.0);

        log::debug!(
            "[Prediction] hour {:02} ({}): base volume = {}, base speed = {}, multiplier = {:.1}, predicted volume = {}, predicted speed = {}",
            hour, weather, sample.volume, sample.speed, multiplier, predicted_volume, predicted_speed
        );

        Ok(PredictionResult {
            departure_hour: hour,
            weather,
            predicted_volume,
            predicted_speed,
            estimated_minutes,
            congestion_level,
            confidence_percent,
            weather_delay_percent,
            recommendations: recommendations(predicted_volume, multiplier, hour),
        })
    }

    /// Forecast every hour in the table under one weather condition.
    pub fn forecast_day<R: Rng + ?Sized>(
        &self,
        weather: WeatherCondition,
        rng: &mut R,
    ) -> Result<Vec<PredictionResult>, PredictionError> {
        self.samples
            .iter()
            .map(|s| self.predict_for(s.hour, weather, rng))
            .collect()
    }

    // Exact match or the fixed fallback entry; no nearest-hour search.
    fn sample_for(&self, hour: u32) -> &'static HourlyTrafficSample {
        self.samples
            .iter()
            .find(|s| s.hour == hour)
            .unwrap_or_else(fallback_sample)
    }
}

/// Extracts the hour from a departure time, or `None` if absent or unreadable.
pub fn parse_departure_hour(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.hour())
        .or_else(|| {
            NaiveTime::parse_from_str(raw, TIME_ONLY_FORMAT)
                .ok()
                .map(|t| t.hour())
        })
}

pub fn checked_multiplier(multiplier: f64) -> Result<f64, PredictionError> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(multiplier)
    } else {
        Err(PredictionError::InvalidMultiplier(multiplier))
    }
}

/// Maps a uniform draw in [0, 1) onto the confidence range [85, 95).
pub fn confidence_from_unit(unit: f64) -> u32 {
    let offset = (unit.clamp(0.0, 1.0) * CONFIDENCE_SPAN as f64).floor() as u32;
    CONFIDENCE_BASE + offset.min(CONFIDENCE_SPAN - 1)
}

/// Route advice, weather advice, peak-hour advice, always in that order.
pub fn recommendations(predicted_volume: i64, multiplier: f64, hour: u32) -> [String; 3] {
    let route = if predicted_volume > HIGH_CONGESTION_VOLUME {
        "Consider alternative routes"
    } else {
        "Primary route looks good"
    };
    let weather = if multiplier > WEATHER_ADVICE_MULTIPLIER {
        "Allow extra time due to weather"
    } else {
        "Normal travel time expected"
    };
    let peak = if PEAK_MORNING_HOURS.contains(&hour) {
        "Peak morning hours - expect delays"
    } else {
        "Off-peak travel time"
    };
    [route.to_string(), weather.to_string(), peak.to_string()]
}

// Half-to-even, so 36 / 1.6 = 22.5 gives 22 as the dashboard always showed.
fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
