pub mod alerts;
pub mod anomalies;
pub mod health;
pub mod risk;
pub mod samples;
pub mod seed;
pub mod simulation;
pub mod websocket;
pub mod zones;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::SimulationManager;
use crate::store::TelemetryStore;
use crate::ws::WsHub;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TelemetryStore>,
    pub ws_hub: WsHub,
    pub simulations: SimulationManager,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Zones
        .route("/api/v1/zones", get(zones::list))
        .route("/api/v1/zones/:zone_id", get(zones::get_by_id))
        .route("/api/v1/zones/:zone_id/baseline", get(zones::get_baseline))
        .route("/api/v1/zones/:zone_id/baseline/recompute", post(zones::recompute_baseline))
        // Samples
        .route("/api/v1/zones/:zone_id/samples", get(samples::list).post(samples::append))
        // Risk
        .route("/api/v1/risk/summary", get(risk::get_summary))
        .route("/api/v1/zones/:zone_id/risk", get(risk::get_zone_risk))
        .route("/api/v1/zones/:zone_id/score", get(risk::get_score))
        // Anomalies
        .route("/api/v1/zones/:zone_id/anomalies", get(anomalies::list))
        // Alerts
        .route("/api/v1/alerts", get(alerts::list))
        .route("/api/v1/alerts/:id/acknowledge", post(alerts::acknowledge))
        // Simulation
        .route("/api/v1/simulations", get(simulation::list_running))
        .route("/api/v1/zones/:zone_id/simulation", get(simulation::get_live))
        .route("/api/v1/zones/:zone_id/simulation/start", post(simulation::start))
        .route("/api/v1/zones/:zone_id/simulation/stop", post(simulation::stop))
        // Seeding
        .route("/api/v1/seed", post(seed::seed));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(websocket::ws_handler))
        .merge(api)
        .with_state(state)
}
