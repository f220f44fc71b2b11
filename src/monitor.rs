//! Store-backed entry points into the analytics core, shared by the HTTP
//! handlers and the background jobs.

use crate::analytics::{self, policy};
use crate::models::{AnomalyEvent, Baseline, CompositeScore, RiskSummary, SampleOrder, Zone};
use crate::store::{StoreError, TelemetryStore};

pub async fn zone_or_not_found(store: &dyn TelemetryStore, zone_id: &str) -> Result<Zone, StoreError> {
    store
        .get_zone(zone_id)
        .await?
        .ok_or_else(|| StoreError::not_found("Zone", zone_id))
}

/// Risk snapshot for one zone.
pub async fn zone_risk(store: &dyn TelemetryStore, zone: &Zone) -> Result<RiskSummary, StoreError> {
    let baseline = store.get_baseline(&zone.zone_id).await?;
    let recent = store
        .get_recent_samples(&zone.zone_id, policy::RISK_FETCH_WINDOW, SampleOrder::NewestFirst)
        .await?;
    let assessment = analytics::risk::assess(baseline.as_ref(), &recent);

    Ok(RiskSummary {
        zone_id: zone.zone_id.clone(),
        name: zone.name.clone(),
        location: zone.location.clone(),
        risk_level: assessment.risk_level,
        primary_cause: assessment.primary_cause,
        latency_deviation: assessment.deviations.latency,
        temperature_deviation: assessment.deviations.temperature,
        vibration_deviation: assessment.deviations.vibration,
        current_latency: assessment.current.latency,
        current_temperature: assessment.current.temperature,
        current_vibration: assessment.current.vibration,
    })
}

/// Risk snapshot for every zone, in zone order.
pub async fn risk_summary(store: &dyn TelemetryStore) -> Result<Vec<RiskSummary>, StoreError> {
    let zones = store.list_zones().await?;
    let mut summaries = Vec::with_capacity(zones.len());
    for zone in &zones {
        summaries.push(zone_risk(store, zone).await?);
    }
    Ok(summaries)
}

pub async fn zone_score(store: &dyn TelemetryStore, zone_id: &str) -> Result<CompositeScore, StoreError> {
    let baseline = store.get_baseline(zone_id).await?;
    let samples = store
        .get_recent_samples(zone_id, policy::TREND_WINDOW as i64, SampleOrder::OldestFirst)
        .await?;
    Ok(analytics::composite::score(baseline.as_ref(), &samples))
}

/// Re-derive anomaly events over the newest `limit` samples.
pub async fn zone_anomalies(
    store: &dyn TelemetryStore,
    zone_id: &str,
    limit: i64,
) -> Result<Vec<AnomalyEvent>, StoreError> {
    let Some(baseline) = store.get_baseline(zone_id).await? else {
        return Ok(Vec::new());
    };
    let samples = store
        .get_recent_samples(zone_id, limit, SampleOrder::OldestFirst)
        .await?;
    Ok(analytics::segmenter::segment(zone_id, &samples, &baseline))
}

/// Rebuild the zone's baseline from its learning window and store it.
/// Returns `None` when the zone has no baseline samples.
pub async fn recompute_baseline(
    store: &dyn TelemetryStore,
    zone_id: &str,
) -> Result<Option<Baseline>, StoreError> {
    let window = store.get_baseline_samples(zone_id, policy::BASELINE_WINDOW).await?;
    match analytics::baseline::aggregate(zone_id, &window) {
        Some(baseline) => Ok(Some(store.put_baseline(&baseline).await?)),
        None => Ok(None),
    }
}
