use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{Baseline, Zone};
use crate::monitor;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Zone>>, AppError> {
    let zones = state.store.list_zones().await?;
    Ok(Json(zones))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<Zone>, AppError> {
    let zone = monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    Ok(Json(zone))
}

pub async fn get_baseline(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<Baseline>, AppError> {
    let baseline = state
        .store
        .get_baseline(&zone_id)
        .await?
        .ok_or_else(|| AppError::not_found("Baseline", &zone_id))?;
    Ok(Json(baseline))
}

pub async fn recompute_baseline(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<Baseline>, AppError> {
    monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    let baseline = monitor::recompute_baseline(state.store.as_ref(), &zone_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Baseline samples", &zone_id)
                .with_details(serde_json::json!({ "zone_id": zone_id, "baseline_samples": 0 }))
        })?;
    tracing::info!(zone_id = %zone_id, sample_count = baseline.sample_count, "Baseline recomputed");
    Ok(Json(baseline))
}
