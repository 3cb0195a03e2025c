use crate::global_variables::{SPEED_CHART_FILE, VOLUME_CHART_FILE};
use crate::shared_data::HourlyTrafficSample;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

const VOLUME_COLOR: RGBColor = RGBColor(59, 130, 246);
const SPEED_COLOR: RGBColor = RGBColor(16, 185, 129);

// Widest bar in the congestion strip corresponds to this volume.
const STRIP_FULL_SCALE: u32 = 500;
const STRIP_WIDTH: u32 = 30;

/// Upper bound for a y axis: the maximum plus 10% headroom, rounded up to a step.
pub fn axis_upper_bound(values: impl IntoIterator<Item = u32>, step: u32) -> u32 {
    let max = values.into_iter().max().unwrap_or(0);
    let padded = max + max / 10;
    let step = step.max(1);
    (padded / step + 1) * step
}

fn hour_span(samples: &[HourlyTrafficSample]) -> Option<(u32, u32)> {
    let first = samples.iter().map(|s| s.hour).min()?;
    let last = samples.iter().map(|s| s.hour).max()?;
    Some((first, last))
}

/// Text rendering of the congestion-pattern panel, one line per hour.
pub fn congestion_pattern_lines(samples: &[HourlyTrafficSample]) -> Vec<String> {
    samples
        .iter()
        .map(|s| {
            let cells = (s.volume.min(STRIP_FULL_SCALE) * STRIP_WIDTH / STRIP_FULL_SCALE) as usize;
            format!(
                "{} {:<width$} {:>4} {}",
                s.time_label(),
                "#".repeat(cells),
                s.volume,
                s.congestion,
                width = STRIP_WIDTH as usize
            )
        })
        .collect()
}

pub fn render_volume_chart(path: &Path, samples: &[HourlyTrafficSample]) -> Result<(), Box<dyn Error>> {
    let (first, last) = hour_span(samples).ok_or("no samples to plot")?;
    let y_max = axis_upper_bound(samples.iter().map(|s| s.volume), 100);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Traffic Volume Throughout Day", ("sans-serif", 20))
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first..last, 0u32..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time of Day")
        .y_desc("Vehicles/Hour")
        .x_label_formatter(&|h| format!("{:02}:00", h))
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples.iter().map(|s| (s.hour, s.volume)),
        VOLUME_COLOR.stroke_width(3),
    ))?;
    chart.draw_series(
        samples
            .iter()
            .map(|s| Circle::new((s.hour, s.volume), 4, VOLUME_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

pub fn render_speed_chart(path: &Path, samples: &[HourlyTrafficSample]) -> Result<(), Box<dyn Error>> {
    let (first, last) = hour_span(samples).ok_or("no samples to plot")?;
    let y_max = axis_upper_bound(samples.iter().map(|s| s.speed), 10);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Speed Analysis", ("sans-serif", 20))
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((first..last + 1).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time of Day")
        .y_desc("km/h")
        .x_label_formatter(&|v| match v {
            SegmentValue::Exact(h) | SegmentValue::CenterOf(h) => format!("{:02}:00", h),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(SPEED_COLOR.filled())
            .margin(5)
            .data(samples.iter().map(|s| (s.hour, s.speed))),
    )?;

    root.present()?;
    Ok(())
}

/// Renders both analytics charts into `dir` and returns the written paths.
pub fn render_analytics(dir: &Path, samples: &[HourlyTrafficSample]) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let volume_path = dir.join(VOLUME_CHART_FILE);
    let speed_path = dir.join(SPEED_CHART_FILE);
    render_volume_chart(&volume_path, samples)?;
    render_speed_chart(&speed_path, samples)?;
    log::info!("Analytics charts written to {}", dir.display());
    Ok(vec![volume_path, speed_path])
}
