use axum::{extract::State, Json};

use crate::handlers::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store_ok = state.store.list_zones().await.is_ok();
    Json(serde_json::json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "store": store_ok,
        "simulations": state.simulations.running_zones().await.len(),
    }))
}
