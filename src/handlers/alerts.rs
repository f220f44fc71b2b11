use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::analytics::policy::DEFAULT_ALERT_LIMIT;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{AlertQueryParams, RiskAlert};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AlertQueryParams>,
) -> Result<Json<Vec<RiskAlert>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_ALERT_LIMIT).clamp(1, 1_000);
    let alerts = state
        .store
        .list_risk_alerts(params.zone_id.as_deref(), limit)
        .await?;
    Ok(Json(alerts))
}

pub async fn acknowledge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RiskAlert>, AppError> {
    let alert = state.store.acknowledge_risk_alert(id).await?;
    Ok(Json(alert))
}
