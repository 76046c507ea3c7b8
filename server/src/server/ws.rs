//! Per-connection WebSocket plumbing: one reader loop, one writer task.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use holdem_shared::{ClientMsg, GameError, ServerMsg};

use super::hub::ConnId;
use super::state::AppState;
use super::view;
use super::handlers;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Session token minted by the (external) session endpoint.
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

async fn handle_socket(socket: WebSocket, state: AppState, query: ConnectQuery) {
    let conn: ConnId = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    let token = query.token;
    let name = query
        .name
        .unwrap_or_else(|| format!("player-{}", conn));
    state.sessions.ensure(&token, &name).await;
    tracing::info!(conn, name = %name, "client connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMsg>(state.config.channel_buffer);

    // Writer task: drains the outbound queue. Serialization failures are
    // bugs; send failures mean the peer is gone.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(txt) => {
                    if sink.send(Message::Text(txt)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(%err, "failed to serialize outbound message");
                }
            }
        }
    });

    state.hub.register(conn, token.clone(), tx.clone()).await;

    // Connect-time snapshot: the lobby, plus the table the session is
    // already seated at (reconnects resync this way).
    let _ = tx
        .send(ServerMsg::LobbyState(state.lobby_state().await))
        .await;
    if let Some(session) = state.sessions.get(&token).await {
        if let Some(table_id) = session.table_id {
            if let Some(table_arc) = state.table(&table_id).await {
                let snapshot = view::snapshot(&*table_arc.read().await);
                let _ = tx
                    .send(ServerMsg::TableState(view::project(&snapshot, session.seat)))
                    .await;
            }
        }
    }

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(txt)) => match serde_json::from_str::<ClientMsg>(&txt) {
                Ok(msg) => {
                    if let Err(err) = handlers::handle_client_msg(&state, &token, msg).await {
                        let _ = tx.send(ServerMsg::error(&err)).await;
                    }
                }
                Err(err) => {
                    tracing::warn!(conn, %err, "unparseable client frame");
                    let _ = tx.send(ServerMsg::error(&GameError::BadMessage)).await;
                }
            },
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    // Disconnect: drop the registration; the seat and chips stay for the
    // session to reclaim on reconnect.
    state.hub.unregister(conn).await;
    writer.abort();
    tracing::info!(conn, "client disconnected");
}
