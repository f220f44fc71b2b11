use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::handlers::AppState;
use crate::ws::WsHub;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub zone_id: String,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Response {
    let hub = state.ws_hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, params.zone_id, hub))
}

async fn handle_socket(socket: WebSocket, zone_id: String, hub: WsHub) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe to the zone's broadcast channel
    let mut rx = hub.subscribe(&zone_id).await;

    let welcome = serde_json::json!({
        "type": "connected",
        "zone_id": zone_id,
        "message": "WebSocket connection established"
    });
    if sender.send(Message::Text(welcome.to_string())).await.is_err() {
        return;
    }

    // Forward broadcast messages to this client
    let mut send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Drain incoming messages until the client closes
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!(zone_id = %zone_id, "WebSocket client disconnected");
}
