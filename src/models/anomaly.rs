use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RiskLevel, Sample};

/// A closed interval of sustained deviation from baseline. Derived on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnomalyEvent {
    pub id: String,
    pub zone_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub peak_latency: f64,
    pub peak_temperature: f64,
    pub peak_vibration: f64,
    pub risk_level: RiskLevel,
    pub points: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
pub struct AnomalyQueryParams {
    pub limit: Option<i64>,
}
