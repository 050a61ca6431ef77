//! WebSocket Support
//!
//! One stream per connection carrying every topic. The roster snapshot
//! (`agents:initial`) is always the first frame; after that every bus event is
//! forwarded as it is published. A client that falls behind skips the events
//! it missed and carries on.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use finadvise_types::{ClientEvent, ServerEvent};

use crate::state::AppState;

/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(event: &ServerEvent) -> Option<Message> {
    match event.to_frame() {
        Ok(frame) => Some(Message::Text(frame)),
        Err(e) => {
            warn!(topic = %event.topic(), error = %e, "Failed to encode event");
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before taking the snapshot so nothing published in between is lost
    let mut rx = state.source.subscribe();
    let initial = state.source.initial_event();
    info!(
        %connection_id,
        subscribers = state.source.bus().subscriber_count(),
        "Client connected"
    );

    let send_task = tokio::spawn(async move {
        if let Some(frame) = encode(&initial) {
            if sender.send(frame).await.is_err() {
                return;
            }
        }

        loop {
            match rx.recv().await {
                Ok(event) => {
                    let Some(frame) = encode(&event) else { continue };
                    if sender.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%connection_id, skipped, "Client lagging, events skipped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match ClientEvent::from_frame(&text) {
                Ok(event) => info!(%connection_id, event = event.name(), ?event, "Client event"),
                Err(e) => debug!(%connection_id, error = %e, "Ignoring unrecognized client frame"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    info!(%connection_id, "Client disconnected");
}
