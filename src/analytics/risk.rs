//! Snapshot risk classification of a zone against its baseline.

use crate::models::{Baseline, Metric, MetricTriple, RiskAssessment, RiskLevel, Sample};

use super::policy::{HIGH_THRESHOLD_PCT, MEDIUM_THRESHOLD_PCT, RECENT_WINDOW};
use super::{deviations, max_abs};

pub const NO_DATA: &str = "No data";
pub const NORMAL_OPERATION: &str = "Normal operation";

impl RiskAssessment {
    pub fn no_data() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            primary_cause: NO_DATA.into(),
            deviations: MetricTriple::default(),
            current: MetricTriple::default(),
        }
    }
}

/// Classify a zone from its baseline and its recent samples, newest first.
///
/// Only the `RECENT_WINDOW` newest samples feed the average, however many
/// were fetched. A missing or unusable baseline, or an empty window, yields
/// `Low` / "No data" with zeroed deviations.
pub fn assess(baseline: Option<&Baseline>, recent_newest_first: &[Sample]) -> RiskAssessment {
    let (Some(baseline), Some(latest)) = (baseline, recent_newest_first.first()) else {
        return RiskAssessment::no_data();
    };

    let window = &recent_newest_first[..recent_newest_first.len().min(RECENT_WINDOW)];
    let n = window.len() as f64;
    let avg_recent = window.iter().fold(MetricTriple::default(), |acc, s| MetricTriple {
        latency: acc.latency + s.latency / n,
        temperature: acc.temperature + s.temperature / n,
        vibration: acc.vibration + s.vibration / n,
    });

    let Some(devs) = deviations(&avg_recent, baseline) else {
        return RiskAssessment::no_data();
    };

    let (risk_level, primary_cause) = classify(&devs);

    RiskAssessment {
        risk_level,
        primary_cause: primary_cause.into(),
        deviations: devs,
        current: latest.metrics(),
    }
}

/// Risk level and cause label for a set of signed deviations.
pub fn classify(devs: &MetricTriple) -> (RiskLevel, &'static str) {
    let max_deviation = max_abs(devs);

    if max_deviation > HIGH_THRESHOLD_PCT {
        (RiskLevel::High, high_cause(dominant_metric(devs, max_deviation)))
    } else if max_deviation > MEDIUM_THRESHOLD_PCT {
        (RiskLevel::Medium, medium_cause(dominant_metric(devs, max_deviation)))
    } else {
        (RiskLevel::Low, NORMAL_OPERATION)
    }
}

/// First metric, in latency/temperature/vibration order, whose absolute
/// deviation equals the maximum exactly.
fn dominant_metric(devs: &MetricTriple, max_deviation: f64) -> Metric {
    Metric::ALL
        .into_iter()
        .find(|m| devs.get(*m).abs() == max_deviation)
        .unwrap_or(Metric::Vibration)
}

fn high_cause(metric: Metric) -> &'static str {
    match metric {
        Metric::Latency => "Latency drift detected",
        Metric::Temperature => "Thermal drift detected",
        Metric::Vibration => "Vibration anomaly detected",
    }
}

fn medium_cause(metric: Metric) -> &'static str {
    match metric {
        Metric::Latency => "Elevated latency",
        Metric::Temperature => "Temperature elevation",
        Metric::Vibration => "Vibration increase",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{baseline, sample};

    fn newest_first(latencies: &[f64], temperature: f64, vibration: f64) -> Vec<Sample> {
        latencies
            .iter()
            .enumerate()
            .map(|(i, l)| sample(100 - i as i64, *l, temperature, vibration))
            .collect()
    }

    #[test]
    fn test_no_baseline_is_no_data() {
        let recent = newest_first(&[1.2; 10], 22.0, 0.15);
        let result = assess(None, &recent);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.primary_cause, "No data");
        assert_eq!(result.deviations, MetricTriple::default());
        assert_eq!(result.current, MetricTriple::default());
    }

    #[test]
    fn test_empty_window_is_no_data() {
        let b = baseline(1.0, 22.0, 0.15);
        let result = assess(Some(&b), &[]);
        assert_eq!(result, RiskAssessment::no_data());
    }

    #[test]
    fn test_zero_average_baseline_is_no_data() {
        let b = baseline(0.0, 22.0, 0.15);
        let result = assess(Some(&b), &newest_first(&[1.0; 10], 22.0, 0.15));
        assert_eq!(result.primary_cause, "No data");
        assert!(result.deviations.latency.is_finite());
    }

    #[test]
    fn test_high_latency_drift() {
        let b = baseline(1.0, 22.0, 0.15);
        let recent = newest_first(&[1.2; 10], 22.5, 0.152);
        let result = assess(Some(&b), &recent);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.primary_cause, "Latency drift detected");
        assert!((result.deviations.latency - 20.0).abs() < 1e-6);
        assert_eq!(result.current.latency, 1.2);
    }

    #[test]
    fn test_medium_elevated_latency() {
        let b = baseline(1.0, 22.0, 0.15);
        let recent = newest_first(&[1.1; 10], 22.0, 0.15);
        let result = assess(Some(&b), &recent);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.primary_cause, "Elevated latency");
    }

    #[test]
    fn test_normal_operation() {
        let b = baseline(1.0, 22.0, 0.15);
        let result = assess(Some(&b), &newest_first(&[1.03; 10], 22.2, 0.151));
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.primary_cause, "Normal operation");
    }

    #[test]
    fn test_only_five_newest_are_averaged() {
        let b = baseline(1.0, 22.0, 0.15);
        // Five baseline-level points followed by five old, heavily drifted ones.
        let mut latencies = vec![1.0; 5];
        latencies.extend([3.0; 5]);
        let result = assess(Some(&b), &newest_first(&latencies, 22.0, 0.15));
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.deviations.latency.abs() < 1e-9);
    }

    #[test]
    fn test_short_window_averages_available_samples() {
        let b = baseline(1.0, 22.0, 0.15);
        for n in 1..=4 {
            let result = assess(Some(&b), &newest_first(&vec![1.2; n], 22.0, 0.15));
            assert_eq!(result.risk_level, RiskLevel::High, "n = {n}");
            assert!((result.deviations.latency - 20.0).abs() < 1e-6, "n = {n}");
            assert!(result.deviations.temperature.abs() < 1e-9, "n = {n}");
        }

        let mixed = assess(Some(&b), &newest_first(&[1.3, 1.0], 22.0, 0.15));
        assert!((mixed.deviations.latency - 15.0).abs() < 1e-6);
        assert_eq!(mixed.current.latency, 1.3);
    }

    #[test]
    fn test_thermal_and_vibration_causes() {
        let b = baseline(1.0, 20.0, 0.10);
        let hot = assess(Some(&b), &newest_first(&[1.0; 5], 24.0, 0.10));
        assert_eq!(hot.primary_cause, "Thermal drift detected");

        let shaky = assess(Some(&b), &newest_first(&[1.0; 5], 20.0, 0.11));
        assert_eq!(shaky.risk_level, RiskLevel::Medium);
        assert_eq!(shaky.primary_cause, "Vibration increase");
    }

    #[test]
    fn test_tie_prefers_latency_then_temperature() {
        let (level, cause) = classify(&MetricTriple::new(-20.0, 20.0, 20.0));
        assert_eq!(level, RiskLevel::High);
        assert_eq!(cause, "Latency drift detected");

        let (_, cause) = classify(&MetricTriple::new(1.0, 10.0, -10.0));
        assert_eq!(cause, "Temperature elevation");
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(classify(&MetricTriple::new(8.0, 0.0, 0.0)).0, RiskLevel::Low);
        assert_eq!(classify(&MetricTriple::new(15.0, 0.0, 0.0)).0, RiskLevel::Medium);
    }
}
