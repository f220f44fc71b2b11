use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use serde::Serialize;

use crate::models::{AnomalyEvent, RiskAlert, Sample};

#[derive(Debug, Clone, Serialize)]
pub struct WsMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub zone_id: String,
    pub data: serde_json::Value,
}

/// Per-zone broadcast channels. The push half of the data-access contract:
/// subscribers are told when a zone's data changes and pull snapshots from
/// the store themselves.
#[derive(Clone, Default)]
pub struct WsHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the broadcast channel for a zone. Channels whose
    /// subscribers have all gone are dropped here.
    pub async fn subscribe(&self, zone_id: &str) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
        let sender = channels.entry(zone_id.to_string()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(256);
            tx
        });
        sender.subscribe()
    }

    /// Broadcast a message to every subscriber of the message's zone.
    pub async fn broadcast(&self, msg: WsMessage) {
        let channels = self.channels.read().await;
        if let Some(sender) = channels.get(&msg.zone_id) {
            if let Ok(json) = serde_json::to_string(&msg) {
                let _ = sender.send(json);
            }
        }
    }

    async fn send<T: Serialize>(&self, msg_type: &str, zone_id: &str, payload: &T) {
        let data = serde_json::to_value(payload).unwrap_or_default();
        self.broadcast(WsMessage {
            msg_type: msg_type.into(),
            zone_id: zone_id.to_string(),
            data,
        })
        .await;
    }

    pub async fn send_sample(&self, sample: &Sample) {
        self.send("sample", &sample.zone_id, sample).await;
    }

    pub async fn send_risk_alert(&self, alert: &RiskAlert) {
        self.send("risk_alert", &alert.zone_id, alert).await;
    }

    pub async fn send_anomaly(&self, event: &AnomalyEvent) {
        self.send("anomaly", &event.zone_id, event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::sample;

    #[tokio::test]
    async fn test_subscriber_receives_zone_messages_only() {
        let hub = WsHub::new();
        let mut rack1 = hub.subscribe("RACK-01").await;
        let mut rack2 = hub.subscribe("RACK-02").await;

        hub.send_sample(&sample(0, 1.0, 22.0, 0.15)).await;

        let msg: serde_json::Value = serde_json::from_str(&rack1.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "sample");
        assert_eq!(msg["zone_id"], "RACK-01");
        assert_eq!(msg["data"]["latency"], 1.0);
        assert!(rack2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_abandoned_channels_are_pruned() {
        let hub = WsHub::new();
        let first = hub.subscribe("RACK-01").await;
        drop(first);
        let _rack2 = hub.subscribe("RACK-02").await;

        let channels = hub.channels.read().await;
        assert_eq!(channels.len(), 1);
        assert!(channels.contains_key("RACK-02"));
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_dropped() {
        let hub = WsHub::new();
        hub.send_sample(&sample(0, 1.0, 22.0, 0.15)).await;
        let mut late = hub.subscribe("RACK-01").await;
        assert!(late.try_recv().is_err());
    }
}
