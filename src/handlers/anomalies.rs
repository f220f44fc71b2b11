use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::analytics::policy::DEFAULT_ANOMALY_WINDOW;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{AnomalyEvent, AnomalyQueryParams};
use crate::monitor;

/// Anomaly events re-derived from the zone's newest samples.
pub async fn list(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
    Query(params): Query<AnomalyQueryParams>,
) -> Result<Json<Vec<AnomalyEvent>>, AppError> {
    monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    let limit = params.limit.unwrap_or(DEFAULT_ANOMALY_WINDOW).clamp(1, 10_000);
    let events = monitor::zone_anomalies(state.store.as_ref(), &zone_id, limit).await?;
    Ok(Json(events))
}
