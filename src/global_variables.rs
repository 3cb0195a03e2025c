// Route the engine assumes for every ETA (Route A, the highway).
pub const ROUTE_DISTANCE_KM: f64 = 15.2;

// Congestion thresholds on predicted vehicles/hour (strictly greater than).
pub const HIGH_CONGESTION_VOLUME: i64 = 350;
pub const MEDIUM_CONGESTION_VOLUME: i64 = 250;

// Weather multiplier above which extra travel time is advised.
pub const WEATHER_ADVICE_MULTIPLIER: f64 = 1.2;

// Morning peak, inclusive on both ends.
pub const PEAK_MORNING_HOURS: std::ops::RangeInclusive<u32> = 7..=9;

// Confidence score is CONFIDENCE_BASE + [0, CONFIDENCE_SPAN).
pub const CONFIDENCE_BASE: u32 = 85;
pub const CONFIDENCE_SPAN: u32 = 10;

// Index of the 14:00 sample, used when the departure hour has no entry.
pub const FALLBACK_SAMPLE_INDEX: usize = 8;

// Accepted departure time layouts, tried in order.
pub const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
pub const TIME_ONLY_FORMAT: &str = "%H:%M";

// Default artifacts
pub const DEFAULT_LOADING_DELAY_MS: u64 = 2000;
pub const MAX_LOADING_DELAY_MS: u64 = 60_000;
pub const DEFAULT_PREDICTION_LOG: &str = "predictions.csv";
pub const VOLUME_CHART_FILE: &str = "traffic_volume.png";
pub const SPEED_CHART_FILE: &str = "average_speed.png";

pub const CONFIG_ENV_VAR: &str = "TRAFFIC_DASHBOARD_CONFIG";
