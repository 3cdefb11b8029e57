//! Websocket relay of geofence notifications.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::GatewayState;

pub(super) async fn notifications(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    let notifications = state.bridge.subscribe();
    ws.on_upgrade(move |socket| relay(socket, notifications))
}

/// Push every notification to the client; client frames are discarded.
async fn relay(socket: WebSocket, mut notifications: broadcast::Receiver<String>) {
    let (mut sink, mut stream) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(payload) => {
                    if sink.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "websocket client is lagging, notifications dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            if let Message::Close(_) = message {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    debug!("websocket client disconnected");
}
