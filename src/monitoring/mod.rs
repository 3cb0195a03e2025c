pub mod charts;
pub mod dashboard;
pub mod prediction_log;
