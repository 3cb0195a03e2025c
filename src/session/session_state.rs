use crate::session::prediction_scheduler::PredictionOutcome;
use crate::shared_data::{PredictionResult, TripRequest};

/// Everything the dashboard remembers between menu actions.
///
/// Owned by the shell; the engine only ever sees a copy of `form`.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSession {
    pub form: TripRequest,
    pub prediction: Option<PredictionResult>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self {
            form: TripRequest {
                weather_condition: "Clear".to_string(),
                ..TripRequest::default()
            },
            prediction: None,
            loading: false,
            last_error: None,
        }
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The predict button is enabled only with both locations and a departure time.
    pub fn is_form_valid(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        filled(&self.form.start_location)
            && filled(&self.form.end_location)
            && self.form.departure_time.as_deref().map(filled).unwrap_or(false)
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && self.is_form_valid()
    }

    /// Applies an edit to the form. Returns true when a prediction was in flight,
    /// in which case the caller must cancel it.
    pub fn edit_form<F: FnOnce(&mut TripRequest)>(&mut self, edit: F) -> bool {
        edit(&mut self.form);
        let was_loading = self.loading;
        self.loading = false;
        was_loading
    }

    /// Marks the session as loading and hands out the request to schedule.
    pub fn begin_prediction(&mut self) -> Option<TripRequest> {
        if !self.can_submit() {
            return None;
        }
        self.loading = true;
        self.last_error = None;
        Some(self.form.clone())
    }

    pub fn apply_outcome(&mut self, outcome: PredictionOutcome) {
        match outcome {
            PredictionOutcome::Completed(result) => {
                self.prediction = Some(result);
                self.loading = false;
            }
            PredictionOutcome::Failed(e) => {
                self.last_error = Some(e.to_string());
                self.loading = false;
            }
            PredictionOutcome::Cancelled => {
                self.loading = false;
            }
            // A newer request owns the loading flag now.
            PredictionOutcome::Superseded => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictionError;
    use crate::shared_data::{CongestionLevel, WeatherCondition};

    fn filled_session() -> DashboardSession {
        let mut session = DashboardSession::new();
        session.edit_form(|form| {
            form.start_location = "Central Station".to_string();
            form.end_location = "Harbour Bridge".to_string();
            form.departure_time = Some("2024-06-03T08:00".to_string());
        });
        session
    }

    fn result(volume: i64) -> PredictionResult {
        PredictionResult {
            departure_hour: 8,
            weather: WeatherCondition::Rain,
            predicted_volume: volume,
            predicted_speed: 19,
            estimated_minutes: 48,
            congestion_level: CongestionLevel::from_volume(volume),
            confidence_percent: 90,
            weather_delay_percent: 30,
            recommendations: [String::new(), String::new(), String::new()],
        }
    }

    #[test]
    fn form_needs_locations_and_departure() {
        let mut session = DashboardSession::new();
        assert_eq!(session.form.weather_condition, "Clear");
        assert!(!session.is_form_valid());

        session.edit_form(|form| {
            form.start_location = "A".to_string();
            form.end_location = "B".to_string();
        });
        assert!(!session.is_form_valid());

        session.edit_form(|form| form.departure_time = Some("  ".to_string()));
        assert!(!session.is_form_valid());

        assert!(filled_session().is_form_valid());
    }

    #[test]
    fn cannot_submit_while_loading() {
        let mut session = filled_session();
        assert!(session.begin_prediction().is_some());
        assert!(session.loading);
        assert!(session.begin_prediction().is_none());
    }

    #[test]
    fn completed_result_replaces_previous() {
        let mut session = filled_session();
        session.begin_prediction();
        session.apply_outcome(PredictionOutcome::Completed(result(300)));
        session.begin_prediction();
        session.apply_outcome(PredictionOutcome::Completed(result(546)));

        assert!(!session.loading);
        assert_eq!(session.prediction.map(|p| p.predicted_volume), Some(546));
    }

    #[test]
    fn editing_while_loading_reports_stale_request() {
        let mut session = filled_session();
        session.begin_prediction();
        assert!(session.edit_form(|form| form.weather_condition = "Snow".to_string()));
        assert!(!session.loading);
        assert!(!session.edit_form(|form| form.weather_condition = "Fog".to_string()));
    }

    #[test]
    fn failure_keeps_last_prediction_and_records_error() {
        let mut session = filled_session();
        session.begin_prediction();
        session.apply_outcome(PredictionOutcome::Completed(result(300)));
        session.begin_prediction();
        session.apply_outcome(PredictionOutcome::Failed(
            PredictionError::InvalidWeatherCondition("Hail".to_string()),
        ));
        assert!(session.prediction.is_some());
        assert!(session.last_error.unwrap().contains("Hail"));
    }

    #[test]
    fn superseded_leaves_loading_untouched() {
        let mut session = filled_session();
        session.begin_prediction();
        session.apply_outcome(PredictionOutcome::Superseded);
        assert!(session.loading);
    }
}
