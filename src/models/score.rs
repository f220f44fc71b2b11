use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change_pct: f64,
}

impl Trend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            change_pct: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ScoreStatus {
    Stable,
    #[serde(rename = "Stress Building")]
    StressBuilding,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "Stable"),
            Self::StressBuilding => write!(f, "Stress Building"),
            Self::HighRisk => write!(f, "High Risk"),
        }
    }
}

/// Continuous 0-100 latency risk score with its contributing factors.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompositeScore {
    pub score: f64,
    pub status: ScoreStatus,
    pub avg_latency: f64,
    pub volatility: f64,
    pub deviation_pct: f64,
    pub volatility_pct: f64,
    pub trend: Trend,
}

impl CompositeScore {
    pub fn no_data() -> Self {
        Self {
            score: 0.0,
            status: ScoreStatus::Stable,
            avg_latency: 0.0,
            volatility: 0.0,
            deviation_pct: 0.0,
            volatility_pct: 0.0,
            trend: Trend::stable(),
        }
    }
}
