//! Reduces a baseline-learning window into per-zone reference statistics.

use crate::models::{Baseline, MetricTriple, Sample};

/// Averages and maxima of every metric across the baseline-flagged samples.
///
/// Samples without `is_baseline` are ignored. Returns `None` for an empty
/// window: callers must treat that as "no baseline", never as zeros.
/// `updated_at` is the newest timestamp in the window.
pub fn aggregate(zone_id: &str, samples: &[Sample]) -> Option<Baseline> {
    let window: Vec<&Sample> = samples.iter().filter(|s| s.is_baseline).collect();
    let last = window.iter().map(|s| s.timestamp).max()?;

    let mut sum = MetricTriple::default();
    let mut max = window[0].metrics();
    for s in &window {
        sum.latency += s.latency;
        sum.temperature += s.temperature;
        sum.vibration += s.vibration;
        max = max.max_with(&s.metrics());
    }
    let count = window.len() as f64;

    Some(Baseline {
        zone_id: zone_id.to_string(),
        avg_latency: sum.latency / count,
        avg_temperature: sum.temperature / count,
        avg_vibration: sum.vibration / count,
        max_latency: max.latency,
        max_temperature: max.temperature,
        max_vibration: max.vibration,
        sample_count: window.len() as i64,
        updated_at: last,
    })
}
