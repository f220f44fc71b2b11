use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::MetricTriple;

/// Learned per-zone reference statistics. One current record per zone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Baseline {
    pub zone_id: String,
    pub avg_latency: f64,
    pub avg_temperature: f64,
    pub avg_vibration: f64,
    pub max_latency: f64,
    pub max_temperature: f64,
    pub max_vibration: f64,
    pub sample_count: i64,
    pub updated_at: DateTime<Utc>,
}

impl Baseline {
    pub fn averages(&self) -> MetricTriple {
        MetricTriple::new(self.avg_latency, self.avg_temperature, self.avg_vibration)
    }

    /// Averages are divisors for every deviation percentage; a baseline with
    /// any non-positive average carries no signal.
    pub fn is_usable(&self) -> bool {
        [self.avg_latency, self.avg_temperature, self.avg_vibration]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}
