use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::jobs::LiveSnapshot;
use crate::monitor;

pub async fn start(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<LiveSnapshot>, AppError> {
    monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    let snapshot = state.simulations.start(&zone_id).await?;
    Ok(Json(snapshot))
}

pub async fn stop(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.simulations.stop(&zone_id).await {
        return Err(AppError::not_found("Simulation", &zone_id));
    }
    Ok(Json(serde_json::json!({ "zone_id": zone_id, "running": false })))
}

pub async fn get_live(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<LiveSnapshot>, AppError> {
    let snapshot = state
        .simulations
        .snapshot(&zone_id)
        .await
        .ok_or_else(|| AppError::not_found("Simulation", &zone_id))?;
    Ok(Json(snapshot))
}

pub async fn list_running(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.simulations.running_zones().await)
}
