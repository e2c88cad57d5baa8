use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::builder::store::BuilderView;
use crate::models::RenderView;
use crate::AppState;

/// Event types for WebSocket messages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BuilderUpdated,
    RenderCompleted,
    RenderFailed,
}

/// WebSocket event message
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

/// Payload for auto-update render results. `revision` is the builder
/// revision the render was started for; clients keep the latest one.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPayload {
    pub builder_id: Uuid,
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<RenderView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// WebSocket hub manages connections and broadcasts events
pub struct Hub {
    tx: broadcast::Sender<String>,
    client_count: Arc<RwLock<usize>>,
}

impl Hub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            tx,
            client_count: Arc::new(RwLock::new(0)),
        }
    }

    /// Broadcast an event to all connected clients
    pub async fn broadcast_event(&self, event: Event) {
        let data = match serde_json::to_string(&event) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Error serializing WebSocket event: {}", e);
                return;
            }
        };

        let count = self.client_count().await;
        if count > 0 {
            if let Err(e) = self.tx.send(data) {
                tracing::warn!("Error broadcasting WebSocket event: {}", e);
            } else {
                tracing::debug!("Broadcasting {:?} to {} clients", event.event_type, count);
            }
        }
    }

    pub async fn broadcast_builder_updated(&self, view: &BuilderView) {
        self.broadcast_event(Event {
            event_type: EventType::BuilderUpdated,
            payload: serde_json::to_value(view).unwrap_or_default(),
        })
        .await;
    }

    pub async fn broadcast_render_completed(&self, builder_id: Uuid, revision: u64, view: RenderView) {
        self.broadcast_event(Event {
            event_type: EventType::RenderCompleted,
            payload: serde_json::to_value(RenderPayload {
                builder_id,
                revision,
                view: Some(view),
                error: None,
            })
            .unwrap_or_default(),
        })
        .await;
    }

    pub async fn broadcast_render_failed(&self, builder_id: Uuid, revision: u64, error: &str) {
        self.broadcast_event(Event {
            event_type: EventType::RenderFailed,
            payload: serde_json::to_value(RenderPayload {
                builder_id,
                revision,
                view: None,
                error: Some(error.to_string()),
            })
            .unwrap_or_default(),
        })
        .await;
    }

    /// Get the number of connected clients
    pub async fn client_count(&self) -> usize {
        *self.client_count.read().await
    }

    /// Subscribe to events
    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    async fn increment_clients(&self) {
        let mut count = self.client_count.write().await;
        *count += 1;
        tracing::info!("WebSocket client connected. Total clients: {}", *count);
    }

    async fn decrement_clients(&self) {
        let mut count = self.client_count.write().await;
        *count = count.saturating_sub(1);
        tracing::info!("WebSocket client disconnected. Total clients: {}", *count);
    }
}

#[cfg(test)]
impl Hub {
    /// Register as a connected client and subscribe
    pub(crate) async fn listen(&self) -> broadcast::Receiver<String> {
        self.increment_clients().await;
        self.subscribe()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let hub = state.ws_hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<Hub>) {
    let (mut sender, mut receiver) = socket.split();

    hub.increment_clients().await;

    let mut rx = hub.subscribe();

    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Client messages are ignored; reading keeps the connection alive
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            if msg.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    hub.decrement_clients().await;
}
