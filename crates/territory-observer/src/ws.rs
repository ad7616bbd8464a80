//! `WebSocket` handler for real-time outbound tick streaming.
//!
//! Clients connect to `GET /ws/room` and receive a JSON-encoded
//! `OutboundTick` message each time the engine completes a tick. The
//! handler uses a broadcast receiver so all connected clients see the
//! same stream.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent tick.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::adapter::WsBroadcastAdapter;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming outbound ticks.
///
/// # Route
///
/// `GET /ws/room`
pub async fn ws_room(ws: WebSocketUpgrade, State(adapter): State<Arc<WsBroadcastAdapter>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, adapter))
}

/// Handle the `WebSocket` lifecycle: subscribe to the broadcast channel
/// and forward each outbound tick as a text frame.
async fn handle_ws(mut socket: WebSocket, adapter: Arc<WsBroadcastAdapter>) {
    debug!("WebSocket client connected");

    let mut rx = adapter.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(tick) => {
                        let Ok(json) = serde_json::to_string(&tick) else {
                            warn!("failed to serialize outbound tick");
                            continue;
                        };
                        let msg: Message = Message::Text(json.into());
                        if socket.send(msg).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
