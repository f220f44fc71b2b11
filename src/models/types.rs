use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar")]
#[sqlx(rename_all = "lowercase")]
pub enum ZoneStatus {
    #[serde(rename = "active")]
    #[sqlx(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    #[sqlx(rename = "inactive")]
    Inactive,
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Discrete risk classification shared by risk alerts and anomaly events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// The three telemetry channels every sample carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Latency,
    Temperature,
    Vibration,
}

impl Metric {
    /// Tie-break order used when several metrics share the largest deviation.
    pub const ALL: [Metric; 3] = [Metric::Latency, Metric::Temperature, Metric::Vibration];
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latency => write!(f, "latency"),
            Self::Temperature => write!(f, "temperature"),
            Self::Vibration => write!(f, "vibration"),
        }
    }
}

/// One value per metric. Used for averages, peaks, deviations and simulator state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricTriple {
    pub latency: f64,
    pub temperature: f64,
    pub vibration: f64,
}

impl MetricTriple {
    pub fn new(latency: f64, temperature: f64, vibration: f64) -> Self {
        Self { latency, temperature, vibration }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Latency => self.latency,
            Metric::Temperature => self.temperature,
            Metric::Vibration => self.vibration,
        }
    }

    pub fn map(&self, f: impl Fn(Metric, f64) -> f64) -> Self {
        Self {
            latency: f(Metric::Latency, self.latency),
            temperature: f(Metric::Temperature, self.temperature),
            vibration: f(Metric::Vibration, self.vibration),
        }
    }

    /// Per-metric maximum.
    pub fn max_with(&self, other: &Self) -> Self {
        Self {
            latency: self.latency.max(other.latency),
            temperature: self.temperature.max(other.temperature),
            vibration: self.vibration.max(other.vibration),
        }
    }
}
