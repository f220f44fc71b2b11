use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::MetricTriple;

/// A single telemetry reading for a zone. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Sample {
    pub id: Uuid,
    pub zone_id: String,
    pub timestamp: DateTime<Utc>,
    pub latency: f64,
    pub temperature: f64,
    pub vibration: f64,
    pub is_baseline: bool,
}

impl Sample {
    pub fn metrics(&self) -> MetricTriple {
        MetricTriple::new(self.latency, self.temperature, self.vibration)
    }
}

/// A sample as handed to the store. The store assigns `id`, and `timestamp`
/// when the caller leaves it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSample {
    pub zone_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub latency: f64,
    pub temperature: f64,
    pub vibration: f64,
    #[serde(default)]
    pub is_baseline: bool,
}

impl NewSample {
    pub fn into_sample(self, now: DateTime<Utc>) -> Sample {
        Sample {
            id: Uuid::new_v4(),
            zone_id: self.zone_id,
            timestamp: self.timestamp.unwrap_or(now),
            latency: self.latency,
            temperature: self.temperature,
            vibration: self.vibration,
            is_baseline: self.is_baseline,
        }
    }
}

impl From<&Sample> for NewSample {
    fn from(sample: &Sample) -> Self {
        Self {
            zone_id: sample.zone_id.clone(),
            timestamp: Some(sample.timestamp),
            latency: sample.latency,
            temperature: sample.temperature,
            vibration: sample.vibration,
            is_baseline: sample.is_baseline,
        }
    }
}

/// Body of `POST /api/v1/zones/:zone_id/samples`.
#[derive(Debug, Deserialize)]
pub struct AppendSampleRequest {
    pub latency: f64,
    pub temperature: f64,
    pub vibration: f64,
    #[serde(default)]
    pub is_baseline: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SampleQueryParams {
    pub limit: Option<i64>,
}

/// Ordering requested from `get_recent_samples`. Both variants select the
/// same newest `limit` samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrder {
    NewestFirst,
    OldestFirst,
}
