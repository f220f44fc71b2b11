use axum::{extract::State, Json};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::seed::{seed_demo_data, SeedReport};

pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedReport>, AppError> {
    state.simulations.stop_all().await;
    let mut rng = StdRng::from_entropy();
    let report = seed_demo_data(state.store.as_ref(), Utc::now(), &mut rng).await?;
    Ok(Json(report))
}
