// prediction_scheduler.rs

use crate::error::PredictionError;
use crate::flow_analyzer::PredictionEngine;
use crate::shared_data::{PredictionResult, TripRequest};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// How a scheduled prediction ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Completed(PredictionResult),
    Failed(PredictionError),
    /// A newer request was submitted before the delay elapsed.
    Superseded,
    /// The request was abandoned, e.g. because the form changed.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Superseded,
    Cancelled,
}

/// A prediction waiting out the loading delay.
#[derive(Debug)]
pub struct PendingPrediction {
    handle: JoinHandle<PredictionOutcome>,
}

impl PendingPrediction {
    pub async fn outcome(self) -> PredictionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Prediction task failed: {}", e);
                PredictionOutcome::Cancelled
            }
        }
    }
}

/// Runs the engine behind an artificial loading delay.
///
/// At most one request is in flight. Submitting a new one supersedes the old
/// one, so a stale result can never overwrite a fresher one.
pub struct PredictionScheduler {
    engine: PredictionEngine,
    delay: Duration,
    rng: Arc<Mutex<SmallRng>>,
    in_flight: Option<oneshot::Sender<StopReason>>,
}

impl PredictionScheduler {
    pub fn new(engine: PredictionEngine, delay: Duration, rng: SmallRng) -> Self {
        Self {
            engine,
            delay,
            rng: Arc::new(Mutex::new(rng)),
            in_flight: None,
        }
    }

    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn with_seed(engine: PredictionEngine, delay: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self::new(engine, delay, rng)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }

    pub fn submit(&mut self, request: TripRequest) -> PendingPrediction {
        self.stop_in_flight(StopReason::Superseded);

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.in_flight = Some(cancel_tx);

        let engine = self.engine;
        let rng = Arc::clone(&self.rng);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                reason = cancel_rx => match reason {
                    Ok(StopReason::Superseded) => PredictionOutcome::Superseded,
                    Ok(StopReason::Cancelled) | Err(_) => PredictionOutcome::Cancelled,
                },
                _ = sleep(delay) => run_engine(&engine, &request, &rng),
            }
        });

        PendingPrediction { handle }
    }

    /// Abandons the in-flight request, if any.
    pub fn cancel(&mut self) {
        self.stop_in_flight(StopReason::Cancelled);
    }

    fn stop_in_flight(&mut self, reason: StopReason) {
        if let Some(tx) = self.in_flight.take() {
            if tx.send(reason).is_ok() {
                log::info!("Stopped in-flight prediction ({:?})", reason);
            }
        }
    }
}

fn run_engine(
    engine: &PredictionEngine,
    request: &TripRequest,
    rng: &Mutex<SmallRng>,
) -> PredictionOutcome {
    let mut guard = match rng.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match engine.predict(request, &mut *guard) {
        Ok(result) => {
            log::info!(
                "Prediction ready: {} vehicles/h, {} km/h, {} min",
                result.predicted_volume,
                result.predicted_speed,
                result.estimated_minutes
            );
            PredictionOutcome::Completed(result)
        }
        Err(e) => {
            log::warn!("Prediction rejected: {}", e);
            PredictionOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn scheduler(delay_ms: u64) -> PredictionScheduler {
        PredictionScheduler::with_seed(
            PredictionEngine::new(),
            Duration::from_millis(delay_ms),
            Some(11),
        )
    }

    fn rain_at_eight() -> TripRequest {
        TripRequest::new(Some("2024-06-03T08:00"), "Rain")
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_the_delay() {
        let mut scheduler = scheduler(2000);
        let start = Instant::now();
        let pending = scheduler.submit(rain_at_eight());
        assert!(scheduler.is_loading());

        let outcome = pending.outcome().await;
        assert!(start.elapsed() >= Duration::from_millis(2000));
        match outcome {
            PredictionOutcome::Completed(result) => assert_eq!(result.predicted_volume, 546),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!scheduler.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_request_supersedes_older() {
        let mut scheduler = scheduler(2000);
        let stale = scheduler.submit(rain_at_eight());
        let fresh = scheduler.submit(TripRequest::new(Some("2024-06-03T19:00"), "Fog"));

        assert_eq!(stale.outcome().await, PredictionOutcome::Superseded);
        match fresh.outcome().await {
            PredictionOutcome::Completed(result) => {
                assert_eq!(result.departure_hour, 19);
                assert_eq!(result.predicted_volume, 490);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_abandons_request() {
        let mut scheduler = scheduler(2000);
        let pending = scheduler.submit(rain_at_eight());
        scheduler.cancel();
        assert!(!scheduler.is_loading());
        assert_eq!(pending.outcome().await, PredictionOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_weather_fails_after_delay() {
        let mut scheduler = scheduler(10);
        let pending = scheduler.submit(TripRequest::new(Some("2024-06-03T08:00"), "Windy"));
        assert_eq!(
            pending.outcome().await,
            PredictionOutcome::Failed(PredictionError::InvalidWeatherCondition(
                "Windy".to_string()
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn same_seed_gives_same_confidence() {
        let mut a = scheduler(0);
        let mut b = scheduler(0);
        let ra = a.submit(rain_at_eight()).outcome().await;
        let rb = b.submit(rain_at_eight()).outcome().await;
        assert_eq!(ra, rb);
    }
}
