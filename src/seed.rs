//! Demo data: five trading racks with a learned baseline and two hours of
//! recent telemetry, two of them drifting.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::analytics::baseline;
use crate::analytics::policy::BASELINE_WINDOW;
use crate::models::{NewSample, Zone};
use crate::store::{StoreError, TelemetryStore};

const ZONES: [(&str, &str, &str); 5] = [
    ("RACK-01", "Primary Trading Rack", "Data Center A - Row 3"),
    ("RACK-02", "Backup Trading Rack", "Data Center A - Row 4"),
    ("RACK-03", "Market Data Feed", "Data Center B - Row 1"),
    ("RACK-04", "Execution Engine", "Data Center B - Row 2"),
    ("RACK-05", "Risk Analytics", "Data Center C - Row 1"),
];

const RECENT_POINTS: i64 = 60;
/// Recent point after which the drifting racks develop a secondary fault.
const FAULT_ONSET: i64 = 40;

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub zones: usize,
    pub samples: usize,
}

/// Replace all zone data with the demo data set.
pub async fn seed_demo_data<R: Rng + ?Sized>(
    store: &dyn TelemetryStore,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<SeedReport, StoreError> {
    store.clear_zone_data().await?;
    let mut total = 0;

    for (zone_id, name, location) in ZONES {
        store.upsert_zone(&Zone::new(zone_id, name, location)).await?;

        let base_latency = 0.5 + rng.gen::<f64>() * 0.5;
        let base_temperature = 22.0 + rng.gen::<f64>() * 3.0;
        let base_vibration = 0.1 + rng.gen::<f64>() * 0.1;

        let window_start = now - Duration::hours(24);
        let learning: Vec<NewSample> = (0..BASELINE_WINDOW)
            .map(|i| NewSample {
                zone_id: zone_id.to_string(),
                timestamp: Some(window_start + Duration::minutes(2 * i)),
                latency: base_latency + (rng.gen::<f64>() - 0.5) * 0.1,
                temperature: base_temperature + (rng.gen::<f64>() - 0.5),
                vibration: base_vibration + (rng.gen::<f64>() - 0.5) * 0.02,
                is_baseline: true,
            })
            .collect();

        let learned: Vec<_> = learning.iter().cloned().map(|s| s.into_sample(now)).collect();
        if let Some(mut baseline) = baseline::aggregate(zone_id, &learned) {
            baseline.updated_at = now - Duration::hours(12);
            store.put_baseline(&baseline).await?;
        }
        total += store.append_samples(learning).await?;

        let drifting = zone_id == "RACK-01" || zone_id == "RACK-03";
        let recent_start = now - Duration::hours(2);
        let mut recent = Vec::with_capacity(RECENT_POINTS as usize);
        for i in 0..RECENT_POINTS {
            let drift = if drifting { 1.0 + (i as f64 / RECENT_POINTS as f64) * 0.25 } else { 1.0 };
            let mut latency = base_latency * drift + (rng.gen::<f64>() - 0.5) * 0.1;
            let mut temperature = base_temperature + (rng.gen::<f64>() - 0.5);
            let mut vibration = base_vibration + (rng.gen::<f64>() - 0.5) * 0.02;

            if drifting && i > FAULT_ONSET {
                let steps = (i - FAULT_ONSET) as f64;
                if zone_id == "RACK-01" {
                    temperature = base_temperature + 3.0 + steps * 0.15;
                    latency *= 1.1;
                } else {
                    vibration = base_vibration + steps * 0.01;
                    latency *= 1.15;
                }
            }

            recent.push(NewSample {
                zone_id: zone_id.to_string(),
                timestamp: Some(recent_start + Duration::minutes(2 * i)),
                latency,
                temperature,
                vibration,
                is_baseline: false,
            });
        }
        total += store.append_samples(recent).await?;
    }

    info!(zones = ZONES.len(), samples = total, "Seeded demo data");
    Ok(SeedReport {
        zones: ZONES.len(),
        samples: total,
    })
}
