mod analytics;
mod config;
mod db;
mod errors;
mod handlers;
mod jobs;
mod models;
mod monitor;
mod seed;
mod store;
mod ws;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::jobs::SimulationManager;
use crate::store::{MemoryStore, PgStore, TelemetryStore};
use crate::ws::WsHub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "rackwatch=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");

    let store: Arc<dyn TelemetryStore> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url())
                .await?;
            tracing::info!("Connected to PostgreSQL");

            sqlx::raw_sql(include_str!("../migrations/001_initial_schema.sql"))
                .execute(&pool)
                .await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_on_startup {
        let mut rng = StdRng::from_entropy();
        seed::seed_demo_data(store.as_ref(), chrono::Utc::now(), &mut rng).await?;
    }

    let ws_hub = WsHub::new();
    let simulations = SimulationManager::new(store.clone(), ws_hub.clone(), config.simulator.clone());

    for zone_id in &config.simulator.autostart_zones {
        if let Err(e) = simulations.start(zone_id).await {
            tracing::error!(zone_id = %zone_id, error = %e, "Failed to autostart simulation");
        }
    }

    // Spawn background jobs
    jobs::spawn_background_jobs(store.clone(), config.jobs.clone(), ws_hub.clone());

    let state = AppState {
        store,
        ws_hub,
        simulations: simulations.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting rackwatch on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulations.stop_all().await;
    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
