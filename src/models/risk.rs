use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{MetricTriple, RiskLevel};

/// Persisted snapshot of an elevated risk classification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RiskAlert {
    pub id: Uuid,
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub primary_cause: String,
    pub latency_deviation: f64,
    pub temperature_deviation: f64,
    pub vibration_deviation: f64,
    pub acknowledged: bool,
}

impl RiskAlert {
    pub fn from_summary(summary: &RiskSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            zone_id: summary.zone_id.clone(),
            timestamp,
            risk_level: summary.risk_level,
            primary_cause: summary.primary_cause.clone(),
            latency_deviation: summary.latency_deviation,
            temperature_deviation: summary.temperature_deviation,
            vibration_deviation: summary.vibration_deviation,
            acknowledged: false,
        }
    }
}

/// Output of the risk scorer for one zone.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub primary_cause: String,
    /// Signed percentage deviation of the recent average from baseline.
    pub deviations: MetricTriple,
    /// Raw values of the newest sample.
    pub current: MetricTriple,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub zone_id: String,
    pub name: String,
    pub location: String,
    pub risk_level: RiskLevel,
    pub primary_cause: String,
    pub latency_deviation: f64,
    pub temperature_deviation: f64,
    pub vibration_deviation: f64,
    pub current_latency: f64,
    pub current_temperature: f64,
    pub current_vibration: f64,
}

#[derive(Debug, Deserialize)]
pub struct AlertQueryParams {
    pub zone_id: Option<String>,
    pub limit: Option<i64>,
}
