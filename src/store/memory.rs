use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Baseline, NewSample, RiskAlert, Sample, SampleOrder, Zone};

use super::{StoreError, TelemetryStore};

#[derive(Debug, Default)]
struct Tables {
    zones: BTreeMap<String, Zone>,
    /// Per zone, ascending by timestamp.
    samples: HashMap<String, Vec<Sample>>,
    baselines: HashMap<String, Baseline>,
    alerts: Vec<RiskAlert>,
}

/// Alerts kept by [`MemoryStore`] before the oldest are dropped.
pub const MAX_RETAINED_ALERTS: usize = 10_000;

/// Process-local store. Used when no database is configured and in tests.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    alert_capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_alert_capacity(MAX_RETAINED_ALERTS)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alert_capacity(alert_capacity: usize) -> Self {
        Self {
            tables: RwLock::default(),
            alert_capacity: alert_capacity.max(1),
        }
    }
}

fn newest(samples: &[Sample], limit: i64) -> &[Sample] {
    let limit = usize::try_from(limit).unwrap_or(0);
    &samples[samples.len().saturating_sub(limit)..]
}

#[async_trait]
impl TelemetryStore for MemoryStore {
    async fn list_zones(&self) -> Result<Vec<Zone>, StoreError> {
        Ok(self.tables.read().await.zones.values().cloned().collect())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, StoreError> {
        Ok(self.tables.read().await.zones.get(zone_id).cloned())
    }

    async fn upsert_zone(&self, zone: &Zone) -> Result<Zone, StoreError> {
        let mut tables = self.tables.write().await;
        tables.zones.insert(zone.zone_id.clone(), zone.clone());
        Ok(zone.clone())
    }

    async fn get_baseline(&self, zone_id: &str) -> Result<Option<Baseline>, StoreError> {
        Ok(self.tables.read().await.baselines.get(zone_id).cloned())
    }

    async fn put_baseline(&self, baseline: &Baseline) -> Result<Baseline, StoreError> {
        let mut tables = self.tables.write().await;
        tables.baselines.insert(baseline.zone_id.clone(), baseline.clone());
        Ok(baseline.clone())
    }

    async fn get_recent_samples(
        &self,
        zone_id: &str,
        limit: i64,
        order: SampleOrder,
    ) -> Result<Vec<Sample>, StoreError> {
        let tables = self.tables.read().await;
        let Some(samples) = tables.samples.get(zone_id) else {
            return Ok(Vec::new());
        };
        let mut recent = newest(samples, limit).to_vec();
        if order == SampleOrder::NewestFirst {
            recent.reverse();
        }
        Ok(recent)
    }

    async fn get_baseline_samples(&self, zone_id: &str, limit: i64) -> Result<Vec<Sample>, StoreError> {
        let tables = self.tables.read().await;
        let baseline_samples: Vec<Sample> = tables
            .samples
            .get(zone_id)
            .map(|all| all.iter().filter(|s| s.is_baseline).cloned().collect())
            .unwrap_or_default();
        Ok(newest(&baseline_samples, limit).to_vec())
    }

    async fn append_sample(&self, sample: NewSample) -> Result<Sample, StoreError> {
        super::validate_sample(&sample)?;
        let sample = sample.into_sample(Utc::now());
        let mut tables = self.tables.write().await;
        let series = tables.samples.entry(sample.zone_id.clone()).or_default();
        let at = series.partition_point(|s| s.timestamp <= sample.timestamp);
        series.insert(at, sample.clone());
        Ok(sample)
    }

    async fn list_risk_alerts(&self, zone_id: Option<&str>, limit: i64) -> Result<Vec<RiskAlert>, StoreError> {
        let tables = self.tables.read().await;
        let mut alerts: Vec<RiskAlert> = tables
            .alerts
            .iter()
            .filter(|a| zone_id.map_or(true, |z| a.zone_id == z))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(alerts)
    }

    async fn create_risk_alert(&self, alert: &RiskAlert) -> Result<RiskAlert, StoreError> {
        let mut tables = self.tables.write().await;
        tables.alerts.push(alert.clone());
        let excess = tables.alerts.len().saturating_sub(self.alert_capacity);
        tables.alerts.drain(..excess);
        Ok(alert.clone())
    }

    async fn acknowledge_risk_alert(&self, id: Uuid) -> Result<RiskAlert, StoreError> {
        let mut tables = self.tables.write().await;
        let alert = tables
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::not_found("RiskAlert", id))?;
        alert.acknowledged = true;
        Ok(alert.clone())
    }

    async fn clear_zone_data(&self) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.zones.clear();
        tables.samples.clear();
        tables.baselines.clear();
        Ok(())
    }
}
