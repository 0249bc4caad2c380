//! WebSocket connection handlers: the per-connection lifecycle adapter.
//!
//! One task per connection blocks on the read half and feeds the message
//! pipeline; all writes (broadcast deliveries, the initial history push,
//! keepalive pings) go through the connection's write guard. The
//! `Closing → Closed` transition at the bottom of `handle_socket` runs
//! exactly once no matter which path ended the read loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;

use crate::{
    domain::{Author, MessageBody, RoomName},
    hub::{ConnId, ConnectionHandle, ConnectionSink, DeliveryOutcome, SinkError},
    infrastructure::dto::websocket::InboundFrame,
    ui::state::AppState,
    usecase::{JoinRoomError, PostMessageError},
};

/// Server-initiated keepalive: a dead peer turns the next ping into a
/// write failure instead of holding a registry slot forever.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

/// `ConnectionSink` over the write half of an axum WebSocket.
struct WebSocketSink {
    sender: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl ConnectionSink for WebSocketSink {
    async fn send_text(&mut self, payload: &str) -> Result<(), SinkError> {
        self.sender
            .send(Message::Text(payload.to_string().into()))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }

    async fn send_ping(&mut self) -> Result<(), SinkError> {
        self.sender
            .send(Message::Ping(Vec::new().into()))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        // Best-effort close handshake before releasing the transport.
        let _ = self.sender.send(Message::Close(None)).await;
        self.sender
            .close()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_name = match RoomName::try_from(room.clone()) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Invalid room name '{}': {}", room, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let author = match Author::try_from(query.username.clone()) {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!("Invalid username '{}': {}", query.username, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Rooms are created explicitly; joining an unknown room is a 404. The
    // rendered history doubles as the new connection's first payload.
    let history = match state.join_room_usecase.execute(&room_name).await {
        Ok(history) => history,
        Err(JoinRoomError::RoomNotFound) => {
            tracing::warn!("Room '{}' does not exist. Rejecting connection.", room_name);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to prepare history for room '{}': {}", room_name, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_name, author, history)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room: RoomName,
    author: Author,
    history: String,
) {
    let (sender, receiver) = socket.split();

    let conn = Arc::new(ConnectionHandle::new(
        ConnId::generate(),
        room.clone(),
        Box::new(WebSocketSink { sender }),
    ));

    state.hub.register(conn.clone());
    tracing::info!(conn = %conn.id(), room = %room, author = %author, "connection registered");

    // Push the current message list to the newly connected client through
    // its own write guard, so it cannot interleave with a broadcast.
    if conn.deliver(&history).await == DeliveryOutcome::Delivered {
        read_loop(&state, &conn, &room, &author, receiver).await;
    } else {
        tracing::warn!(conn = %conn.id(), "failed to deliver initial history");
    }

    // Closing → Closed: runs exactly once no matter which path ended the
    // read loop (peer close, read error, failed write, keepalive failure).
    conn.close().await;
    state.hub.unregister(conn.id());
    tracing::info!(conn = %conn.id(), room = %room, "connection closed");
}

/// Block on the read half until the connection dies, feeding each text
/// frame through the message pipeline.
async fn read_loop(
    state: &Arc<AppState>,
    conn: &Arc<ConnectionHandle>,
    room: &RoomName,
    author: &Author,
    mut receiver: SplitStream<WebSocket>,
) {
    let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
    // Skip the first immediate tick
    keepalive.tick().await;

    loop {
        tokio::select! {
            frame = receiver.next() => {
                let msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!(conn = %conn.id(), "WebSocket read error: {}", e);
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => {
                        handle_frame(state, conn, room, author, text.as_str()).await;
                    }
                    Message::Close(_) => {
                        tracing::info!(conn = %conn.id(), "client requested close");
                        break;
                    }
                    Message::Ping(_) | Message::Pong(_) => {
                        // Handled by the protocol layer; nothing to do.
                        tracing::debug!(conn = %conn.id(), "received ping/pong");
                    }
                    other => {
                        tracing::info!(conn = %conn.id(), "ignoring non-text frame: {:?}", other);
                    }
                }
            }
            _ = keepalive.tick() => {
                if conn.ping().await != DeliveryOutcome::Delivered {
                    break;
                }
            }
        }
    }
}

/// One inbound frame through the message pipeline. Every failure here is
/// per-frame: logged, dropped, and the connection keeps reading.
async fn handle_frame(
    state: &Arc<AppState>,
    conn: &Arc<ConnectionHandle>,
    room: &RoomName,
    author: &Author,
    text: &str,
) {
    let frame = match serde_json::from_str::<InboundFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(conn = %conn.id(), "failed to parse frame as JSON: {}", e);
            return;
        }
    };

    // Membership is fixed at upgrade time; a frame naming another room is
    // dropped rather than re-resolving the subscription per message.
    if frame.room != room.as_str() {
        tracing::warn!(
            conn = %conn.id(),
            subscribed = %room,
            requested = %frame.room,
            "frame names a different room, dropping"
        );
        return;
    }

    let body = match MessageBody::try_from(frame.message) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(conn = %conn.id(), "invalid message body: {}", e);
            return;
        }
    };

    if let Err(e) = state
        .post_message_usecase
        .execute(author.clone(), room.clone(), body)
        .await
    {
        match e {
            PostMessageError::RoomNotFound => {
                tracing::warn!(conn = %conn.id(), room = %room, "room vanished from storage");
            }
            other => {
                tracing::warn!(conn = %conn.id(), "failed to post message: {}", other);
            }
        }
    }
}
