mod simulation;

pub use simulation::{LiveSnapshot, SimulationError, SimulationManager};

use std::sync::Arc;
use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{info, error};

use crate::config::JobsConfig;
use crate::models::RiskAlert;
use crate::monitor;
use crate::store::TelemetryStore;
use crate::ws::WsHub;

pub fn spawn_background_jobs(
    store: Arc<dyn TelemetryStore>,
    config: JobsConfig,
    ws_hub: WsHub,
) {
    tokio::spawn(async move {
        let mut ticker = interval(sweep_period(config.risk_alert_interval_secs));
        loop {
            ticker.tick().await;
            info!("Running risk alert sweep");
            if let Err(e) = run_risk_alert_sweep(store.as_ref(), &ws_hub).await {
                error!("Risk alert sweep failed: {e}");
            }
        }
    });

    info!("Background jobs started");
}

/// `interval` rejects a zero period.
fn sweep_period(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

/// Persist and broadcast an alert for every zone currently at Medium or High risk.
async fn run_risk_alert_sweep(store: &dyn TelemetryStore, ws_hub: &WsHub) -> anyhow::Result<usize> {
    let summaries = monitor::risk_summary(store).await?;
    let now = Utc::now();
    let mut raised = 0;

    for summary in summaries.iter().filter(|s| s.risk_level.is_elevated()) {
        match store.create_risk_alert(&RiskAlert::from_summary(summary, now)).await {
            Ok(alert) => {
                ws_hub.send_risk_alert(&alert).await;
                raised += 1;
            }
            Err(e) => error!(zone_id = %summary.zone_id, "Failed to store risk alert: {e}"),
        }
    }

    if raised > 0 {
        info!(count = raised, "Raised risk alerts");
    }
    Ok(raised)
}
