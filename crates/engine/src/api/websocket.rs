//! WebSocket handling for battle observers.
//!
//! Observers only listen: every committed battle event is pushed to them as
//! a JSON text frame. Anything they send, other than a close, is ignored.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use arena_domain::BattleId;
use arena_shared::ServerMessage;

use crate::app::App;

/// Optional filter given when connecting.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchQuery {
    pub battle_id: Option<Uuid>,
}

/// WebSocket upgrade handler - entry point for new observers.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WatchQuery>,
    State(app): State<Arc<App>>,
) -> Response {
    let battle_id = query.battle_id.map(BattleId::from_uuid);
    ws.on_upgrade(move |socket| handle_socket(socket, app, battle_id))
}

async fn handle_socket(socket: WebSocket, app: Arc<App>, battle_id: Option<BattleId>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let connection_id = Uuid::new_v4();

    let (tx, mut rx) = mpsc::channel::<ServerMessage>(app.connections.capacity());
    app.connections.register(connection_id, battle_id, tx).await;

    tracing::info!(connection_id = %connection_id, battle_id = ?battle_id, "Observer connected");

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "Failed to encode message");
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            Ok(_) => {}
        }
    }

    app.connections.unregister(connection_id).await;
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "Observer disconnected");
}
