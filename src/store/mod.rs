//! Data-access contract the analytics core depends on, with a PostgreSQL
//! backend and an in-memory backend.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Baseline, NewSample, RiskAlert, Sample, SampleOrder, Zone};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Metrics must be finite and non-negative before they reach storage.
fn validate_sample(sample: &NewSample) -> Result<(), StoreError> {
    let metrics = [
        ("latency", sample.latency),
        ("temperature", sample.temperature),
        ("vibration", sample.vibration),
    ];
    match metrics.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        Some((name, value)) => Err(StoreError::Validation(format!("{name} out of range: {value}"))),
        None => Ok(()),
    }
}

/// Reads return a consistent snapshot at call time.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError>;

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, StoreError>;

    async fn upsert_zone(&self, zone: &Zone) -> Result<Zone, StoreError>;

    async fn get_baseline(&self, zone_id: &str) -> Result<Option<Baseline>, StoreError>;

    /// Replace the zone's current baseline.
    async fn put_baseline(&self, baseline: &Baseline) -> Result<Baseline, StoreError>;

    /// The newest `limit` samples of a zone, in the requested order.
    async fn get_recent_samples(
        &self,
        zone_id: &str,
        limit: i64,
        order: SampleOrder,
    ) -> Result<Vec<Sample>, StoreError>;

    /// The newest `limit` baseline-flagged samples of a zone, ascending.
    async fn get_baseline_samples(&self, zone_id: &str, limit: i64) -> Result<Vec<Sample>, StoreError>;

    /// Stamps the sample with the current time when it carries no timestamp.
    async fn append_sample(&self, sample: NewSample) -> Result<Sample, StoreError>;

    async fn append_samples(&self, samples: Vec<NewSample>) -> Result<usize, StoreError> {
        let count = samples.len();
        for sample in samples {
            self.append_sample(sample).await?;
        }
        Ok(count)
    }

    /// Newest first, optionally restricted to one zone.
    async fn list_risk_alerts(&self, zone_id: Option<&str>, limit: i64) -> Result<Vec<RiskAlert>, StoreError>;

    async fn create_risk_alert(&self, alert: &RiskAlert) -> Result<RiskAlert, StoreError>;

    async fn acknowledge_risk_alert(&self, id: Uuid) -> Result<RiskAlert, StoreError>;

    /// Remove all zones, samples and baselines.
    async fn clear_zone_data(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// In-memory store that rejects selected writes.
    #[derive(Debug, Default)]
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub reject_samples: bool,
        pub reject_alerts_for: Option<String>,
    }

    #[async_trait]
    impl TelemetryStore for FlakyStore {
        async fn list_zones(&self) -> Result<Vec<Zone>, StoreError> {
            self.inner.list_zones().await
        }

        async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, StoreError> {
            self.inner.get_zone(zone_id).await
        }

        async fn upsert_zone(&self, zone: &Zone) -> Result<Zone, StoreError> {
            self.inner.upsert_zone(zone).await
        }

        async fn get_baseline(&self, zone_id: &str) -> Result<Option<Baseline>, StoreError> {
            self.inner.get_baseline(zone_id).await
        }

        async fn put_baseline(&self, baseline: &Baseline) -> Result<Baseline, StoreError> {
            self.inner.put_baseline(baseline).await
        }

        async fn get_recent_samples(
            &self,
            zone_id: &str,
            limit: i64,
            order: SampleOrder,
        ) -> Result<Vec<Sample>, StoreError> {
            self.inner.get_recent_samples(zone_id, limit, order).await
        }

        async fn get_baseline_samples(&self, zone_id: &str, limit: i64) -> Result<Vec<Sample>, StoreError> {
            self.inner.get_baseline_samples(zone_id, limit).await
        }

        async fn append_sample(&self, sample: NewSample) -> Result<Sample, StoreError> {
            if self.reject_samples {
                return Err(StoreError::Validation("sample writes rejected".into()));
            }
            self.inner.append_sample(sample).await
        }

        async fn list_risk_alerts(&self, zone_id: Option<&str>, limit: i64) -> Result<Vec<RiskAlert>, StoreError> {
            self.inner.list_risk_alerts(zone_id, limit).await
        }

        async fn create_risk_alert(&self, alert: &RiskAlert) -> Result<RiskAlert, StoreError> {
            if self.reject_alerts_for.as_deref() == Some(alert.zone_id.as_str()) {
                return Err(StoreError::Validation(format!("alert writes rejected for {}", alert.zone_id)));
            }
            self.inner.create_risk_alert(alert).await
        }

        async fn acknowledge_risk_alert(&self, id: Uuid) -> Result<RiskAlert, StoreError> {
            self.inner.acknowledge_risk_alert(id).await
        }

        async fn clear_zone_data(&self) -> Result<(), StoreError> {
            self.inner.clear_zone_data().await
        }
    }
}
