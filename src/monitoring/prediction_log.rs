use crate::shared_data::{CongestionLevel, PredictionResult, WeatherCondition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One row of the prediction journal. Recommendations are not journaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: u64,
    pub departure_hour: u32,
    pub weather: WeatherCondition,
    pub predicted_volume: i64,
    pub predicted_speed: i64,
    pub estimated_minutes: i64,
    pub congestion_level: CongestionLevel,
    pub confidence_percent: u32,
    pub weather_delay_percent: i64,
}

impl PredictionRecord {
    pub fn from_result(result: &PredictionResult, timestamp: u64) -> Self {
        Self {
            timestamp,
            departure_hour: result.departure_hour,
            weather: result.weather,
            predicted_volume: result.predicted_volume,
            predicted_speed: result.predicted_speed,
            estimated_minutes: result.estimated_minutes,
            congestion_level: result.congestion_level,
            confidence_percent: result.confidence_percent,
            weather_delay_percent: result.weather_delay_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub total: usize,
    pub average_speed: f64,
    pub average_minutes: f64,
    pub by_congestion: BTreeMap<CongestionLevel, usize>,
}

// Appends a record, writing the header only when the file is new or empty.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn append_prediction(path: &Path, record: &PredictionRecord) -> Result<(), Box<dyn Error>> {
    log_to_csv(path, record)?;
    log::debug!("Journaled prediction for hour {:02} to {}", record.departure_hour, path.display());
    Ok(())
}

pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: PredictionRecord = result?;
        records.push(record);
    }
    Ok(records)
}

pub fn summarize(records: &[PredictionRecord]) -> PredictionReport {
    let total = records.len();
    let mut by_congestion = BTreeMap::new();
    for record in records {
        *by_congestion.entry(record.congestion_level).or_insert(0) += 1;
    }
    let average = |f: fn(&PredictionRecord) -> i64| {
        if total == 0 {
            0.0
        } else {
            records.iter().map(f).sum::<i64>() as f64 / total as f64
        }
    };
    PredictionReport {
        total,
        average_speed: average(|r| r.predicted_speed),
        average_minutes: average(|r| r.estimated_minutes),
        by_congestion,
    }
}

// Prints the journal summary for the history menu entry.
pub fn generate_report_summary(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        println!("No predictions recorded yet.");
        return Ok(());
    }
    let records = read_predictions(path)?;
    let report = summarize(&records);
    println!("Prediction History:");
    for record in &records {
        println!(
            "  {:02}:00 {:<5} -> {} veh/h, {} km/h, {} min, {} ({}%)",
            record.departure_hour,
            record.weather,
            record.predicted_volume,
            record.predicted_speed,
            record.estimated_minutes,
            record.congestion_level,
            record.confidence_percent
        );
    }
    println!("Report Summary:");
    println!("Predictions: {} records", report.total);
    println!("Average predicted speed: {:.1} km/h", report.average_speed);
    println!("Average ETA: {:.1} min", report.average_minutes);
    for (level, count) in &report.by_congestion {
        println!("{} congestion: {} records", level, count);
    }
    Ok(())
}
