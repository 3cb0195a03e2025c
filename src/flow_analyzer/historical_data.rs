use crate::global_variables::FALLBACK_SAMPLE_INDEX;
use crate::shared_data::{CongestionLevel, CurrentStats, HourlyTrafficSample, RouteOption};

use crate::shared_data::CongestionLevel::{High, Low, Medium};

const fn sample(hour: u32, volume: u32, speed: u32, congestion: CongestionLevel) -> HourlyTrafficSample {
    HourlyTrafficSample {
        hour,
        volume,
        speed,
        congestion,
    }
}

/// Hourly samples from 06:00 to 21:00. Never mutated.
pub static HOURLY_SAMPLES: [HourlyTrafficSample; 16] = [
    sample(6, 120, 45, Low),
    sample(7, 280, 35, Medium),
    sample(8, 420, 25, High),
    sample(9, 380, 30, High),
    sample(10, 250, 40, Medium),
    sample(11, 200, 45, Low),
    sample(12, 220, 42, Medium),
    sample(13, 240, 38, Medium),
    sample(14, 260, 36, Medium),
    sample(15, 320, 32, High),
    sample(16, 380, 28, High),
    sample(17, 450, 22, High),
    sample(18, 480, 20, High),
    sample(19, 350, 30, High),
    sample(20, 280, 35, Medium),
    sample(21, 200, 42, Low),
];

pub static ROUTE_OPTIONS: [RouteOption; 3] = [
    RouteOption {
        route: "Route A (Highway)",
        distance: "15.2 km",
        time: "22 min",
        traffic: Medium,
        fuel: "1.2L",
    },
    RouteOption {
        route: "Route B (City Roads)",
        distance: "12.8 km",
        time: "28 min",
        traffic: High,
        fuel: "1.4L",
    },
    RouteOption {
        route: "Route C (Mixed)",
        distance: "14.1 km",
        time: "25 min",
        traffic: Low,
        fuel: "1.1L",
    },
];

pub static CURRENT_STATS: CurrentStats = CurrentStats {
    average_speed: 32,
    congestion_level: 75,
    active_vehicles: 15420,
    weather_impact: 15,
};

/// The 14:00 sample. Used whenever the departure hour has no exact entry.
pub fn fallback_sample() -> &'static HourlyTrafficSample {
    &HOURLY_SAMPLES[FALLBACK_SAMPLE_INDEX]
}

/// Exact-hour lookup; `None` outside 06:00-21:00.
pub fn sample_for_hour(hour: u32) -> Option<&'static HourlyTrafficSample> {
    HOURLY_SAMPLES.iter().find(|s| s.hour == hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_six_to_twenty_one() {
        let hours: Vec<u32> = HOURLY_SAMPLES.iter().map(|s| s.hour).collect();
        assert_eq!(hours, (6..=21).collect::<Vec<_>>());
        assert!(HOURLY_SAMPLES.iter().all(|s| s.volume > 0 && s.speed > 0));
    }

    #[test]
    fn fallback_is_the_fourteen_hundred_entry() {
        let s = fallback_sample();
        assert_eq!((s.hour, s.volume, s.speed), (14, 260, 36));
    }

    #[test]
    fn missing_hours_have_no_sample() {
        assert!(sample_for_hour(5).is_none());
        assert!(sample_for_hour(22).is_none());
        assert_eq!(sample_for_hour(8).map(|s| s.volume), Some(420));
    }
}
