use crate::config::DashboardConfig;
use crate::flow_analyzer::historical_data::{CURRENT_STATS, HOURLY_SAMPLES, ROUTE_OPTIONS};
use crate::flow_analyzer::PredictionEngine;
use crate::monitoring::charts::{congestion_pattern_lines, render_analytics};
use crate::monitoring::prediction_log::{append_prediction, generate_report_summary, PredictionRecord};
use crate::session::{DashboardSession, PendingPrediction, PredictionOutcome, PredictionScheduler};
use crate::shared_data::{
    current_timestamp, CurrentStats, PredictionResult, RouteOption, TripRequest, WeatherCondition,
};
use std::io::{self, stdin, stdout, Write};

pub fn render_header(stats: &CurrentStats) -> String {
    format!(
        "Urban Traffic Flow Predictor\n\
         Avg Speed: {} km/h | Congestion: {}% | Active Vehicles: {} | Weather Impact: {}%",
        stats.average_speed,
        stats.congestion_level,
        group_thousands(stats.active_vehicles),
        stats.weather_impact
    )
}

pub fn render_prediction(result: &PredictionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Traffic Prediction ({:02}:00, {})\n",
        result.departure_hour, result.weather
    ));
    out.push_str(&format!("  Vehicles/Hour:   {}\n", result.predicted_volume));
    out.push_str(&format!("  km/h Avg Speed:  {}\n", result.predicted_speed));
    out.push_str(&format!("  Minutes ETA:     {}\n", result.estimated_minutes));
    out.push_str(&format!("  Confidence:      {}%\n", result.confidence_percent));
    out.push_str(&format!("  Congestion Level: {}\n", result.congestion_level));
    if result.weather_delay_percent > 0 {
        out.push_str(&format!(
            "  Weather Impact:  +{}% delay\n",
            result.weather_delay_percent
        ));
    }
    out.push_str("  Recommendations:\n");
    for rec in &result.recommendations {
        out.push_str(&format!("    - {}\n", rec));
    }
    out
}

pub fn render_routes(routes: &[RouteOption]) -> String {
    let mut out = String::from("Optimal Route Suggestions\n");
    for route in routes {
        out.push_str(&format!(
            "  {:<22} {:>8} {:>8} {:>6}  {} Traffic\n",
            route.route, route.distance, route.time, route.fuel, route.traffic
        ));
    }
    out
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// None on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    stdout().flush()?;
    let mut input = String::new();
    if stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Terminal rendition of the dashboard: owns the session and the scheduler.
pub struct Dashboard {
    config: DashboardConfig,
    engine: PredictionEngine,
    session: DashboardSession,
    scheduler: PredictionScheduler,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let engine = PredictionEngine::new();
        let scheduler = PredictionScheduler::with_seed(engine, config.loading_delay(), config.rng_seed);
        Self {
            config,
            engine,
            session: DashboardSession::new(),
            scheduler,
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Edits the form, cancelling a prediction that was computed from the old values.
    pub fn edit_form<F: FnOnce(&mut TripRequest)>(&mut self, edit: F) {
        if self.session.edit_form(edit) {
            self.scheduler.cancel();
        }
    }

    /// Schedules a prediction for the current form. Returns `None` when the
    /// form is not ready to submit. The form can still be edited until the
    /// pending prediction is passed to `finish_prediction`.
    pub fn start_prediction(&mut self) -> Option<PendingPrediction> {
        let request = self.session.begin_prediction()?;
        println!("Analyzing Traffic...");
        Some(self.scheduler.submit(request))
    }

    /// Waits out the loading delay, stores the outcome and journals completed predictions.
    pub async fn finish_prediction(&mut self, pending: PendingPrediction) -> PredictionOutcome {
        let outcome = pending.outcome().await;
        self.session.apply_outcome(outcome.clone());

        if let PredictionOutcome::Completed(result) = &outcome {
            if self.config.log_predictions {
                let record = PredictionRecord::from_result(result, current_timestamp());
                if let Err(e) = append_prediction(&self.config.prediction_log_path, &record) {
                    eprintln!("Error logging prediction: {}", e);
                }
            }
        }
        outcome
    }

    /// Runs one prediction through the loading delay and stores the outcome.
    pub async fn submit_prediction(&mut self) -> Option<PredictionOutcome> {
        let pending = self.start_prediction()?;
        Some(self.finish_prediction(pending).await)
    }

    async fn prediction_tab(&mut self) -> io::Result<()> {
        println!("\nTrip Details (leave blank to keep the current value)");
        let form = self.session.form.clone();

        let fields: [(&str, String); 4] = [
            ("From", form.start_location.clone()),
            ("To", form.end_location.clone()),
            (
                "Departure Time (YYYY-MM-DDTHH:MM)",
                form.departure_time.clone().unwrap_or_default(),
            ),
            ("Weather Condition (Clear/Rain/Snow/Fog)", form.weather_condition.clone()),
        ];
        let mut answers = Vec::with_capacity(fields.len());
        for (label, current) in &fields {
            let Some(answer) = prompt(&format!("{} [{}]: ", label, current))? else {
                return Ok(());
            };
            answers.push(if answer.is_empty() { current.clone() } else { answer });
        }

        self.edit_form(|form| {
            form.start_location = answers[0].clone();
            form.end_location = answers[1].clone();
            form.departure_time = Some(answers[2].clone()).filter(|s| !s.is_empty());
            form.weather_condition = answers[3].clone();
        });

        match self.submit_prediction().await {
            None => println!("Enter From, To and Departure Time to get a traffic prediction."),
            Some(PredictionOutcome::Completed(result)) => println!("{}", render_prediction(&result)),
            Some(PredictionOutcome::Failed(e)) => eprintln!("Prediction failed: {}", e),
            Some(_) => println!("Prediction was cancelled."),
        }
        Ok(())
    }

    fn analytics_tab(&self) {
        println!("\nCongestion Patterns");
        for line in congestion_pattern_lines(&HOURLY_SAMPLES) {
            println!("  {}", line);
        }

        if let Ok(weather) = self.session.form.weather_condition.parse::<WeatherCondition>() {
            match self.engine.forecast_day(weather, &mut rand::rng()) {
                Ok(day) => {
                    println!("\nForecast under {} weather", weather);
                    for result in day {
                        println!(
                            "  {:02}:00  {:>4} veh/h  {:>3} km/h  {:>3} min  {}",
                            result.departure_hour,
                            result.predicted_volume,
                            result.predicted_speed,
                            result.estimated_minutes,
                            result.congestion_level
                        );
                    }
                }
                Err(e) => eprintln!("Error building forecast: {}", e),
            }
        }

        match render_analytics(&self.config.chart_dir, &HOURLY_SAMPLES) {
            Ok(paths) => {
                for path in paths {
                    println!("Chart saved to {}", path.display());
                }
            }
            Err(e) => eprintln!("Error rendering charts: {}", e),
        }
    }

    pub async fn run_cli(&mut self) {
        println!("{}", render_header(&CURRENT_STATS));
        loop {
            println!("\nUrban Traffic Flow Predictor");
            println!("1. Traffic Prediction");
            println!("2. Route Optimization");
            println!("3. Traffic Analytics");
            println!("4. Prediction History");
            println!("5. Exit");
            let choice = match prompt("Enter your choice: ") {
                Ok(Some(input)) => input.parse::<u32>().unwrap_or(0),
                Ok(None) => 5,
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    5
                }
            };
            match choice {
                1 => {
                    if let Err(e) = self.prediction_tab().await {
                        eprintln!("Error reading trip details: {}", e);
                    }
                }
                2 => println!("\n{}", render_routes(&ROUTE_OPTIONS)),
                3 => self.analytics_tab(),
                4 => {
                    if let Err(e) = generate_report_summary(&self.config.prediction_log_path) {
                        eprintln!("Error generating report summary: {}", e);
                    }
                }
                5 => {
                    println!("Exiting dashboard.");
                    break;
                }
                _ => println!("Invalid choice. Try again."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::prediction_log::read_predictions;

    fn config(dir: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            loading_delay_ms: 2000,
            prediction_log_path: dir.join("predictions.csv"),
            chart_dir: dir.to_path_buf(),
            log_predictions: true,
            rng_seed: Some(5),
        }
    }

    fn fill(form: &mut TripRequest) {
        form.start_location = "Old Town".to_string();
        form.end_location = "Airport".to_string();
        form.departure_time = Some("2024-06-03T08:00".to_string());
        form.weather_condition = "Rain".to_string();
    }

    #[test]
    fn header_groups_vehicle_count() {
        let header = render_header(&CURRENT_STATS);
        assert!(header.contains("15,420"));
        assert!(header.contains("75%"));
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn routes_list_all_three() {
        let text = render_routes(&ROUTE_OPTIONS);
        assert!(text.contains("Route A (Highway)"));
        assert!(text.contains("Route B (City Roads)"));
        assert!(text.contains("Low Traffic"));
    }

    #[tokio::test(start_paused = true)]
    async fn incomplete_form_is_not_submitted() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new(config(dir.path()));
        assert!(dashboard.submit_prediction().await.is_none());
        assert!(!dashboard.session().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_prediction_is_stored_and_journaled() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new(config(dir.path()));
        dashboard.edit_form(fill);

        let outcome = dashboard.submit_prediction().await;
        assert!(matches!(outcome, Some(PredictionOutcome::Completed(_))));

        let stored = dashboard.session().prediction.clone().unwrap();
        assert_eq!(stored.predicted_volume, 546);
        let text = render_prediction(&stored);
        assert!(text.contains("+30% delay"));
        assert!(text.contains("Peak morning hours - expect delays"));

        let rows = read_predictions(&dir.path().join("predictions.csv")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].predicted_speed, 19);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_weather_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new(config(dir.path()));
        dashboard.edit_form(|form| {
            fill(form);
            form.weather_condition = "Windy".to_string();
        });

        let outcome = dashboard.submit_prediction().await;
        assert!(matches!(outcome, Some(PredictionOutcome::Failed(_))));
        assert!(dashboard.session().prediction.is_none());
        assert!(dashboard.session().last_error.is_some());
        assert!(!dir.path().join("predictions.csv").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn editing_mid_flight_cancels_the_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new(config(dir.path()));
        dashboard.edit_form(fill);

        let pending = dashboard.start_prediction().unwrap();
        assert!(dashboard.session().loading);
        dashboard.edit_form(|form| form.weather_condition = "Snow".to_string());

        let outcome = dashboard.finish_prediction(pending).await;
        assert_eq!(outcome, PredictionOutcome::Cancelled);
        assert!(!dashboard.session().loading);
        assert!(dashboard.session().prediction.is_none());
        assert!(!dir.path().join("predictions.csv").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn resubmitting_after_an_edit_uses_the_new_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut dashboard = Dashboard::new(config(dir.path()));
        dashboard.edit_form(fill);

        let stale = dashboard.start_prediction().unwrap();
        dashboard.edit_form(|form| form.weather_condition = "Clear".to_string());
        let fresh = dashboard.start_prediction().unwrap();

        assert_eq!(dashboard.finish_prediction(stale).await, PredictionOutcome::Cancelled);
        match dashboard.finish_prediction(fresh).await {
            PredictionOutcome::Completed(result) => {
                assert_eq!(result.weather, WeatherCondition::Clear);
                assert_eq!(result.predicted_volume, 420);
            }
            other => panic!("expected a completed prediction, got {:?}", other),
        }
        assert_eq!(read_predictions(&dir.path().join("predictions.csv")).unwrap().len(), 1);
    }

    #[test]
    fn clear_weather_hides_delay_line() {
        let result = PredictionEngine::new()
            .predict_for(11, WeatherCondition::Clear, &mut rand::rng())
            .unwrap();
        assert!(!render_prediction(&result).contains("Weather Impact"));
    }
}
