//! Fixed classification policy. Thresholds and window sizes are system
//! constants, never negotiated at runtime.

/// Percentage deviation above which a zone is at least `Medium` risk.
pub const MEDIUM_THRESHOLD_PCT: f64 = 8.0;
/// Percentage deviation above which a zone is `High` risk.
pub const HIGH_THRESHOLD_PCT: f64 = 15.0;

/// Newest samples averaged by the risk scorer.
pub const RECENT_WINDOW: usize = 5;
/// Newest samples fetched per zone for a risk summary.
pub const RISK_FETCH_WINDOW: i64 = 10;
/// Samples used for the composite score's mean and volatility.
pub const SCORE_WINDOW: usize = 10;
/// Samples required before a trend is computed (two score windows).
pub const TREND_WINDOW: usize = 20;
/// Baseline-learning samples per zone (12 hours at one sample per 2 minutes).
pub const BASELINE_WINDOW: i64 = 360;

/// Shortest run of deviating samples reported as an anomaly event.
pub const MIN_EVENT_POINTS: usize = 3;

/// Trend change (percent) beyond which the direction is `up` or `down`.
pub const TREND_CHANGE_PCT: f64 = 2.0;

pub const SCORE_DEVIATION_WEIGHT: f64 = 0.6;
pub const SCORE_VOLATILITY_WEIGHT: f64 = 0.2;
pub const SCORE_TREND_WEIGHT: f64 = 0.2;
/// Composite score at which status becomes "Stress Building".
pub const SCORE_STRESS_THRESHOLD: f64 = 8.0;
/// Composite score at which status becomes "High Risk".
pub const SCORE_HIGH_THRESHOLD: f64 = 15.0;

/// Pull toward baseline applied on every simulator tick.
pub const SIM_MEAN_REVERSION: f64 = 0.05;
/// Chance of an upward stress spike per metric update.
pub const SIM_SPIKE_PROBABILITY: f64 = 0.05;
/// Spike magnitude range, in multiples of the metric's volatility.
pub const SIM_SPIKE_RANGE: (f64, f64) = (1.0, 4.0);
/// Share of simulated samples handed to the store.
pub const SIM_PERSIST_PROBABILITY: f64 = 0.34;

/// Default page sizes for store reads.
pub const DEFAULT_SAMPLE_LIMIT: i64 = 100;
pub const DEFAULT_ALERT_LIMIT: i64 = 50;
pub const DEFAULT_ANOMALY_WINDOW: i64 = 60;
