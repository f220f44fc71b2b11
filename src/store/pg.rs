use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{BaselineRepo, RiskAlertRepo, SampleRepo, ZoneRepo};
use crate::models::{Baseline, NewSample, RiskAlert, Sample, SampleOrder, Zone};

use super::{StoreError, TelemetryStore};

/// PostgreSQL-backed store. Each call runs against the pool independently.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryStore for PgStore {
    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(ZoneRepo::list(&self.pool).await?)
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, StoreError> {
        Ok(ZoneRepo::get(&self.pool, zone_id).await?)
    }

    async fn upsert_zone(&self, zone: &Zone) -> Result<Zone, StoreError> {
        Ok(ZoneRepo::upsert(&self.pool, zone).await?)
    }

    async fn get_baseline(&self, zone_id: &str) -> Result<Option<Baseline>, StoreError> {
        Ok(BaselineRepo::get(&self.pool, zone_id).await?)
    }

    async fn put_baseline(&self, baseline: &Baseline) -> Result<Baseline, StoreError> {
        Ok(BaselineRepo::upsert(&self.pool, baseline).await?)
    }

    async fn get_recent_samples(
        &self,
        zone_id: &str,
        limit: i64,
        order: SampleOrder,
    ) -> Result<Vec<Sample>, StoreError> {
        let mut samples = SampleRepo::recent(&self.pool, zone_id, limit.max(0)).await?;
        if order == SampleOrder::OldestFirst {
            samples.reverse();
        }
        Ok(samples)
    }

    async fn get_baseline_samples(&self, zone_id: &str, limit: i64) -> Result<Vec<Sample>, StoreError> {
        let mut samples = SampleRepo::recent_baseline(&self.pool, zone_id, limit.max(0)).await?;
        samples.reverse();
        Ok(samples)
    }

    async fn append_sample(&self, sample: NewSample) -> Result<Sample, StoreError> {
        super::validate_sample(&sample)?;
        let sample = sample.into_sample(Utc::now());
        Ok(SampleRepo::create(&self.pool, &sample).await?)
    }

    async fn append_samples(&self, samples: Vec<NewSample>) -> Result<usize, StoreError> {
        for sample in &samples {
            super::validate_sample(sample)?;
        }
        let now = Utc::now();
        let samples: Vec<Sample> = samples.into_iter().map(|s| s.into_sample(now)).collect();
        SampleRepo::create_batch(&self.pool, &samples).await?;
        Ok(samples.len())
    }

    async fn list_risk_alerts(&self, zone_id: Option<&str>, limit: i64) -> Result<Vec<RiskAlert>, StoreError> {
        Ok(RiskAlertRepo::list(&self.pool, zone_id, limit.max(0)).await?)
    }

    async fn create_risk_alert(&self, alert: &RiskAlert) -> Result<RiskAlert, StoreError> {
        Ok(RiskAlertRepo::create(&self.pool, alert).await?)
    }

    async fn acknowledge_risk_alert(&self, id: Uuid) -> Result<RiskAlert, StoreError> {
        RiskAlertRepo::acknowledge(&self.pool, id).await.map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::not_found("RiskAlert", id),
            other => StoreError::Database(other),
        })
    }

    async fn clear_zone_data(&self) -> Result<(), StoreError> {
        Ok(ZoneRepo::delete_all(&self.pool).await?)
    }
}
