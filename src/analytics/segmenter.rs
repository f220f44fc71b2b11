//! Streaming segmentation of sustained baseline deviations into anomaly events.
//!
//! The scan is a two-state machine driven one sample at a time:
//!
//! - `Idle`: nothing building. A sample deviating more than
//!   `MEDIUM_THRESHOLD_PCT` on any metric opens an interval.
//! - `Building`: each further deviating sample extends the interval and raises
//!   the per-metric peaks; the first in-baseline sample closes it.
//!
//! Closed intervals shorter than `MIN_EVENT_POINTS` are dropped as noise. The
//! whole scan is re-run from scratch whenever the input changes, so results
//! depend only on `(samples, baseline)`.

use crate::models::{AnomalyEvent, Baseline, MetricTriple, RiskLevel, Sample};

use super::policy::{HIGH_THRESHOLD_PCT, MEDIUM_THRESHOLD_PCT, MIN_EVENT_POINTS};
use super::{deviations, max_abs};

#[derive(Debug)]
struct Interval {
    points: Vec<Sample>,
    peaks: MetricTriple,
}

impl Interval {
    fn open(sample: &Sample) -> Self {
        Self {
            points: vec![sample.clone()],
            peaks: sample.metrics(),
        }
    }

    fn extend(&mut self, sample: &Sample) {
        self.peaks = self.peaks.max_with(&sample.metrics());
        self.points.push(sample.clone());
    }
}

#[derive(Debug)]
enum ScanState {
    Idle,
    Building(Interval),
}

/// Incremental form of [`segment`]. Feed samples in ascending timestamp order,
/// then call [`Segmenter::finish`].
#[derive(Debug)]
pub struct Segmenter<'a> {
    zone_id: &'a str,
    baseline: &'a Baseline,
    state: ScanState,
    events: Vec<AnomalyEvent>,
}

impl<'a> Segmenter<'a> {
    pub fn new(zone_id: &'a str, baseline: &'a Baseline) -> Self {
        Self {
            zone_id,
            baseline,
            state: ScanState::Idle,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: &Sample) {
        let Some(devs) = deviations(&sample.metrics(), self.baseline) else {
            return;
        };
        let deviating = max_abs(&devs) > MEDIUM_THRESHOLD_PCT;

        match (&mut self.state, deviating) {
            (ScanState::Idle, true) => self.state = ScanState::Building(Interval::open(sample)),
            (ScanState::Idle, false) => {}
            (ScanState::Building(interval), true) => interval.extend(sample),
            (ScanState::Building(_), false) => self.close(),
        }
    }

    /// Close any open interval and return every emitted event.
    pub fn finish(mut self) -> Vec<AnomalyEvent> {
        self.close();
        self.events
    }

    fn close(&mut self) {
        let ScanState::Building(interval) = std::mem::replace(&mut self.state, ScanState::Idle) else {
            return;
        };
        if interval.points.len() < MIN_EVENT_POINTS {
            return;
        }
        if let Some(event) = build_event(self.zone_id, self.baseline, interval) {
            self.events.push(event);
        }
    }
}

fn build_event(zone_id: &str, baseline: &Baseline, interval: Interval) -> Option<AnomalyEvent> {
    let start_time = interval.points.first()?.timestamp;
    let end_time = interval.points.last()?.timestamp;
    let peak_devs = deviations(&interval.peaks, baseline)?;

    let risk_level = if max_abs(&peak_devs) > HIGH_THRESHOLD_PCT {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    Some(AnomalyEvent {
        id: event_id(zone_id, start_time),
        zone_id: zone_id.to_string(),
        start_time,
        end_time,
        peak_latency: interval.peaks.latency,
        peak_temperature: interval.peaks.temperature,
        peak_vibration: interval.peaks.vibration,
        risk_level,
        points: interval.points,
    })
}

/// Stable across re-runs over the same data.
pub fn event_id(zone_id: &str, start: chrono::DateTime<chrono::Utc>) -> String {
    format!("{zone_id}-{}", start.timestamp_millis())
}

/// Segment a zone's samples against a fixed baseline.
///
/// Samples are scanned in ascending timestamp order regardless of input
/// order. An unusable baseline yields no events.
pub fn segment(zone_id: &str, samples: &[Sample], baseline: &Baseline) -> Vec<AnomalyEvent> {
    if !baseline.is_usable() {
        return Vec::new();
    }

    let mut ordered: Vec<&Sample> = samples.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    let mut segmenter = Segmenter::new(zone_id, baseline);
    for sample in ordered {
        segmenter.push(sample);
    }
    segmenter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{baseline, latency_series, sample};

    const OK: f64 = 1.0;
    const WARM: f64 = 1.10;
    const HOT: f64 = 1.30;

    #[test]
    fn test_two_points_are_noise() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[OK, OK, WARM, WARM, OK, OK]);
        assert!(segment("RACK-01", &samples, &b).is_empty());
    }

    #[test]
    fn test_three_points_make_one_event() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[OK, OK, WARM, WARM, WARM, OK, OK]);
        let events = segment("RACK-01", &samples, &b);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.points.len(), 3);
        assert_eq!(event.start_time, samples[2].timestamp);
        assert_eq!(event.end_time, samples[4].timestamp);
        assert_eq!(event.risk_level, RiskLevel::Medium);
        assert_eq!(event.id, event_id("RACK-01", samples[2].timestamp));
    }

    #[test]
    fn test_single_gap_splits_events() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[WARM, WARM, WARM, OK, HOT, HOT, HOT]);
        let events = segment("RACK-01", &samples, &b);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].risk_level, RiskLevel::Medium);
        assert_eq!(events[1].risk_level, RiskLevel::High);
        assert_ne!(events[0].id, events[1].id);
    }

    #[test]
    fn test_open_interval_closes_at_end() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[OK, WARM, WARM, HOT]);
        let events = segment("RACK-01", &samples, &b);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].risk_level, RiskLevel::High);
        assert_eq!(events[0].end_time, samples[3].timestamp);
    }

    #[test]
    fn test_peaks_are_tracked_per_metric() {
        let b = baseline(1.0, 20.0, 0.10);
        let samples = vec![
            sample(0, 1.20, 20.0, 0.10),
            sample(1, 1.00, 23.0, 0.10),
            sample(2, 1.00, 20.0, 0.12),
        ];
        let events = segment("RACK-01", &samples, &b);
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!((e.peak_latency, e.peak_temperature, e.peak_vibration), (1.20, 23.0, 0.12));
        assert_eq!(events[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_downward_deviation_counts() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[0.88, 0.88, 0.88]);
        let events = segment("RACK-01", &samples, &b);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].risk_level, RiskLevel::Medium);
        assert_eq!(events[0].peak_latency, 0.88);
    }

    #[test]
    fn test_rerun_is_identical() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[OK, WARM, HOT, WARM, OK, HOT, HOT, HOT, HOT, OK, WARM]);
        let first = serde_json::to_string(&segment("RACK-01", &samples, &b)).unwrap();
        let second = serde_json::to_string(&segment("RACK-01", &samples, &b)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let b = baseline(1.0, 22.0, 0.15);
        let samples = latency_series(&[OK, WARM, WARM, WARM, OK]);
        let mut reversed = samples.clone();
        reversed.reverse();
        assert_eq!(segment("RACK-01", &samples, &b), segment("RACK-01", &reversed, &b));
    }

    #[test]
    fn test_unusable_baseline_yields_nothing() {
        let b = baseline(0.0, 22.0, 0.15);
        let samples = latency_series(&[HOT, HOT, HOT]);
        assert!(segment("RACK-01", &samples, &b).is_empty());
    }
}
