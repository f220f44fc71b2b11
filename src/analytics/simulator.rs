//! Bounded mean-reverting telemetry generator used to emulate a live feed.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{Baseline, Metric, MetricTriple, Sample};

use super::policy::{SIM_MEAN_REVERSION, SIM_PERSIST_PROBABILITY, SIM_SPIKE_PROBABILITY, SIM_SPIKE_RANGE};

/// Noise scale and physical floor of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricProfile {
    pub volatility: f64,
    pub floor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationProfile {
    pub latency: MetricProfile,
    pub temperature: MetricProfile,
    pub vibration: MetricProfile,
}

impl SimulationProfile {
    /// Latency moves by 2% of its baseline, temperature by half a degree,
    /// vibration by 5% of its baseline.
    pub fn for_baseline(baseline: &Baseline) -> Self {
        Self {
            latency: MetricProfile {
                volatility: baseline.avg_latency * 0.02,
                floor: 0.001,
            },
            temperature: MetricProfile {
                volatility: 0.5,
                floor: 20.0,
            },
            vibration: MetricProfile {
                volatility: baseline.avg_vibration * 0.05,
                floor: 0.0,
            },
        }
    }

    pub fn get(&self, metric: Metric) -> MetricProfile {
        match metric {
            Metric::Latency => self.latency,
            Metric::Temperature => self.temperature,
            Metric::Vibration => self.vibration,
        }
    }
}

/// One step of the process: uniform noise, a pull toward baseline, and a rare
/// one-sided upward spike, clamped to the metric's floor.
pub fn next_value<R: Rng + ?Sized>(rng: &mut R, current: f64, baseline: f64, profile: &MetricProfile) -> f64 {
    let noise = rng.gen_range(-0.5..0.5) * profile.volatility;
    let reversion = (baseline - current) * SIM_MEAN_REVERSION;
    let stress = if rng.gen_bool(SIM_SPIKE_PROBABILITY) {
        profile.volatility * rng.gen_range(SIM_SPIKE_RANGE.0..SIM_SPIKE_RANGE.1)
    } else {
        0.0
    };

    (current + noise + reversion + stress).max(profile.floor)
}

#[derive(Debug, Clone)]
pub struct SimulatedTick {
    pub sample: Sample,
    /// Whether this sample should be handed to the store.
    pub persist: bool,
}

/// Per-zone simulation context. Owns the last observed values that anchor the
/// next tick; one instance per zone, never shared.
#[derive(Debug, Clone)]
pub struct ZoneSimulation {
    baseline: Baseline,
    profile: SimulationProfile,
    last: MetricTriple,
}

impl ZoneSimulation {
    /// Start from `anchor` when known, otherwise from the baseline averages.
    pub fn new(baseline: Baseline, anchor: Option<MetricTriple>) -> Self {
        let profile = SimulationProfile::for_baseline(&baseline);
        let last = anchor.unwrap_or_else(|| baseline.averages());
        Self { baseline, profile, last }
    }

    pub fn zone_id(&self) -> &str {
        &self.baseline.zone_id
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> SimulatedTick {
        let averages = self.baseline.averages();
        let mut next = MetricTriple::default();
        for metric in Metric::ALL {
            let value = next_value(rng, self.last.get(metric), averages.get(metric), &self.profile.get(metric));
            match metric {
                Metric::Latency => next.latency = value,
                Metric::Temperature => next.temperature = value,
                Metric::Vibration => next.vibration = value,
            }
        }
        self.last = next;

        SimulatedTick {
            sample: Sample {
                id: Uuid::new_v4(),
                zone_id: self.baseline.zone_id.clone(),
                timestamp: now,
                latency: next.latency,
                temperature: next.temperature,
                vibration: next.vibration,
                is_baseline: false,
            },
            persist: rng.gen_bool(SIM_PERSIST_PROBABILITY),
        }
    }
}
