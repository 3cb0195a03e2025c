pub mod prediction_scheduler;
pub mod session_state;

pub use prediction_scheduler::{PendingPrediction, PredictionOutcome, PredictionScheduler};
pub use session_state::DashboardSession;
