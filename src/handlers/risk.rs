use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{CompositeScore, RiskSummary};
use crate::monitor;

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<Vec<RiskSummary>>, AppError> {
    let summary = monitor::risk_summary(state.store.as_ref()).await?;
    Ok(Json(summary))
}

pub async fn get_zone_risk(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<RiskSummary>, AppError> {
    let zone = monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    let summary = monitor::zone_risk(state.store.as_ref(), &zone).await?;
    Ok(Json(summary))
}

pub async fn get_score(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<CompositeScore>, AppError> {
    monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;
    let score = monitor::zone_score(state.store.as_ref(), &zone_id).await?;
    Ok(Json(score))
}
