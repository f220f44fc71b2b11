//! Monitoring analytics core. Everything here is a pure function of its
//! inputs except the simulator, which draws from a caller-supplied RNG.

pub mod baseline;
pub mod composite;
pub mod policy;
pub mod risk;
pub mod segmenter;
pub mod simulator;

use crate::models::{Baseline, MetricTriple};

/// Signed percentage deviation of `value` from `reference`.
/// Returns `None` when the reference cannot be used as a divisor.
pub fn deviation_pct(value: f64, reference: f64) -> Option<f64> {
    if !reference.is_finite() || reference <= 0.0 {
        return None;
    }
    Some((value - reference) / reference * 100.0)
}

/// Signed per-metric deviations of `values` from the baseline averages.
/// `None` when the baseline is not usable.
pub fn deviations(values: &MetricTriple, baseline: &Baseline) -> Option<MetricTriple> {
    if !baseline.is_usable() {
        return None;
    }
    let averages = baseline.averages();
    Some(values.map(|metric, v| deviation_pct(v, averages.get(metric)).unwrap_or(0.0)))
}

/// Largest absolute deviation across the three metrics.
pub fn max_abs(deviations: &MetricTriple) -> f64 {
    deviations
        .latency
        .abs()
        .max(deviations.temperature.abs())
        .max(deviations.vibration.abs())
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use crate::models::{Baseline, Sample};

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn baseline(latency: f64, temperature: f64, vibration: f64) -> Baseline {
        Baseline {
            zone_id: "RACK-01".into(),
            avg_latency: latency,
            avg_temperature: temperature,
            avg_vibration: vibration,
            max_latency: latency,
            max_temperature: temperature,
            max_vibration: vibration,
            sample_count: 360,
            updated_at: t0(),
        }
    }

    /// Sample `i` of a series taken every 2 minutes from `t0`.
    pub fn sample(i: i64, latency: f64, temperature: f64, vibration: f64) -> Sample {
        Sample {
            id: Uuid::from_u128(i as u128),
            zone_id: "RACK-01".into(),
            timestamp: t0() + Duration::minutes(2 * i),
            latency,
            temperature,
            vibration,
            is_baseline: false,
        }
    }

    /// Ascending series with the given latencies and baseline-level temperature/vibration.
    pub fn latency_series(latencies: &[f64]) -> Vec<Sample> {
        latencies
            .iter()
            .enumerate()
            .map(|(i, l)| sample(i as i64, *l, 22.0, 0.15))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_pct_guards_zero_reference() {
        assert_eq!(deviation_pct(1.2, 0.0), None);
        assert_eq!(deviation_pct(1.2, -1.0), None);
        assert_eq!(deviation_pct(1.2, f64::NAN), None);
        let d = deviation_pct(1.2, 1.0).unwrap();
        assert!((d - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_deviations_require_usable_baseline() {
        let mut baseline = testutil::baseline(1.0, 22.0, 0.15);
        baseline.avg_vibration = 0.0;
        assert!(deviations(&MetricTriple::new(1.0, 22.0, 0.15), &baseline).is_none());
    }
}
