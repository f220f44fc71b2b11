use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ZoneStatus;

/// A monitored infrastructure zone (one server rack).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Zone {
    pub zone_id: String,
    pub name: String,
    pub location: String,
    pub status: ZoneStatus,
}

impl Zone {
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            location: location.into(),
            status: ZoneStatus::Active,
        }
    }
}
