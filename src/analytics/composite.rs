//! Continuous 0-100 latency risk score built from deviation, volatility and
//! short-term trend.

use crate::models::{Baseline, CompositeScore, Sample, ScoreStatus, Trend, TrendDirection};

use super::policy::{
    SCORE_DEVIATION_WEIGHT, SCORE_HIGH_THRESHOLD, SCORE_STRESS_THRESHOLD, SCORE_TREND_WEIGHT,
    SCORE_VOLATILITY_WEIGHT, SCORE_WINDOW, TREND_CHANGE_PCT, TREND_WINDOW,
};
use super::{deviation_pct, mean};

/// Score a zone from its baseline and its recent samples in ascending order.
///
/// Mean and volatility use the newest `SCORE_WINDOW` samples; the trend needs
/// `TREND_WINDOW` samples and is `stable` otherwise. Only a rising trend is
/// penalised.
pub fn score(baseline: Option<&Baseline>, samples_ascending: &[Sample]) -> CompositeScore {
    let Some(baseline) = baseline.filter(|b| b.is_usable()) else {
        return CompositeScore::no_data();
    };
    if samples_ascending.is_empty() {
        return CompositeScore::no_data();
    }

    let latencies: Vec<f64> = samples_ascending.iter().map(|s| s.latency).collect();
    let recent = &latencies[latencies.len().saturating_sub(SCORE_WINDOW)..];

    let avg_latency = mean(recent);
    let volatility = population_std_dev(recent, avg_latency);
    let trend = trend(&latencies);

    let reference = baseline.avg_latency;
    let deviation = deviation_pct(avg_latency, reference).unwrap_or(0.0).abs();
    let volatility_pct = volatility / reference * 100.0;
    let trend_factor = match trend.direction {
        TrendDirection::Up => trend.change_pct.abs(),
        _ => 0.0,
    };

    let raw = deviation * SCORE_DEVIATION_WEIGHT
        + volatility_pct * SCORE_VOLATILITY_WEIGHT
        + trend_factor * SCORE_TREND_WEIGHT;
    let score = raw.clamp(0.0, 100.0);

    CompositeScore {
        score,
        status: status_for(score),
        avg_latency,
        volatility,
        deviation_pct: deviation,
        volatility_pct,
        trend,
    }
}

pub fn status_for(score: f64) -> ScoreStatus {
    if score >= SCORE_HIGH_THRESHOLD {
        ScoreStatus::HighRisk
    } else if score >= SCORE_STRESS_THRESHOLD {
        ScoreStatus::StressBuilding
    } else {
        ScoreStatus::Stable
    }
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Change of the newest window's mean over the window before it.
pub fn trend(latencies: &[f64]) -> Trend {
    if latencies.len() < TREND_WINDOW {
        return Trend::stable();
    }
    let n = latencies.len();
    let previous = mean(&latencies[n - TREND_WINDOW..n - SCORE_WINDOW]);
    let current = mean(&latencies[n - SCORE_WINDOW..]);

    let Some(change_pct) = deviation_pct(current, previous) else {
        return Trend::stable();
    };

    let direction = if change_pct > TREND_CHANGE_PCT {
        TrendDirection::Up
    } else if change_pct < -TREND_CHANGE_PCT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    Trend { direction, change_pct }
}
