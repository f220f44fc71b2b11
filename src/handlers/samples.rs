use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::analytics::policy::DEFAULT_SAMPLE_LIMIT;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{AppendSampleRequest, NewSample, Sample, SampleOrder, SampleQueryParams};
use crate::monitor;

/// Newest samples of a zone in ascending time order.
pub async fn list(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
    Query(params): Query<SampleQueryParams>,
) -> Result<Json<Vec<Sample>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_SAMPLE_LIMIT).clamp(1, 10_000);
    let samples = state
        .store
        .get_recent_samples(&zone_id, limit, SampleOrder::OldestFirst)
        .await?;
    Ok(Json(samples))
}

pub async fn append(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
    Json(req): Json<AppendSampleRequest>,
) -> Result<(StatusCode, Json<Sample>), AppError> {
    validate_metrics(&req)?;
    monitor::zone_or_not_found(state.store.as_ref(), &zone_id).await?;

    let sample = state
        .store
        .append_sample(NewSample {
            zone_id,
            timestamp: req.timestamp,
            latency: req.latency,
            temperature: req.temperature,
            vibration: req.vibration,
            is_baseline: req.is_baseline,
        })
        .await?;
    state.ws_hub.send_sample(&sample).await;
    Ok((StatusCode::CREATED, Json(sample)))
}

fn validate_metrics(req: &AppendSampleRequest) -> Result<(), AppError> {
    for (name, value) in [
        ("latency", req.latency),
        ("temperature", req.temperature),
        ("vibration", req.vibration),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::bad_request(format!("{name} must be a positive number")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(latency: f64, temperature: f64, vibration: f64) -> AppendSampleRequest {
        AppendSampleRequest {
            latency,
            temperature,
            vibration,
            is_baseline: false,
            timestamp: None,
        }
    }

    #[test]
    fn test_validate_metrics() {
        assert!(validate_metrics(&request(0.8, 22.0, 0.15)).is_ok());
        assert!(validate_metrics(&request(0.0, 22.0, 0.15)).is_err());
        assert!(validate_metrics(&request(0.8, -1.0, 0.15)).is_err());
        assert!(validate_metrics(&request(0.8, 22.0, f64::NAN)).is_err());
    }
}
