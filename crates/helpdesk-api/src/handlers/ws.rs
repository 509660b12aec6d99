//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use helpdesk_core::error::AppError;
use helpdesk_core::types::{RoomId, UserId};
use helpdesk_realtime::connection::ConnectionHandle;
use helpdesk_realtime::message::builder::build_error;

use crate::dto::request::WsQuery;
use crate::extractors::path::{parse_room_id, parse_user_id};
use crate::state::AppState;

/// How long the writer may take to flush after the reader stops.
const WRITER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// GET /ws?user_id={user}&room_id={room}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    let user_id = parse_user_id(&query.user_id)?;
    let room_id = query.room_id.as_deref().map(parse_room_id).transpose()?;

    let limit = state.realtime.config.transport_message_limit();
    Ok(ws
        .max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| handle_socket(state, user_id, room_id, socket)))
}

/// Drives one established connection until either side closes it.
async fn handle_socket(
    state: AppState,
    user_id: UserId,
    room_id: Option<RoomId>,
    socket: WebSocket,
) {
    let (ws_tx, mut ws_rx) = socket.split();
    let engine = state.realtime;

    let (handle, outbound) = engine.connections.register(user_id, room_id);
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %handle.user_id,
        room_id = ?handle.room_id.as_ref().map(RoomId::as_str),
        "WebSocket connection established"
    );

    let writer = tokio::spawn(write_loop(handle.clone(), outbound, ws_tx));

    loop {
        tokio::select! {
            next = ws_rx.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    engine.router.handle_frame(&conn_id, text.as_str().as_bytes());
                }
                Some(Ok(Message::Binary(bytes))) => {
                    engine.router.handle_frame(&conn_id, &bytes);
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket read error");
                    engine
                        .connections
                        .send(&conn_id, &build_error(&format!("Connection error: {e}")));
                    break;
                }
            },
            () = handle.closed() => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                break;
            }
        }
    }

    engine.connections.unregister(&conn_id);
    handle.mark_closed();

    if tokio::time::timeout(WRITER_SHUTDOWN_GRACE, writer)
        .await
        .is_err()
    {
        warn!(conn_id = %conn_id, "Writer did not finish in time");
    }

    info!(conn_id = %conn_id, user_id = %handle.user_id, "WebSocket connection closed");
}

/// Forwards queued frames to the socket. Once the connection is closed the
/// remaining queue is flushed and a close frame sent.
async fn write_loop(
    handle: Arc<ConnectionHandle>,
    mut outbound: mpsc::Receiver<String>,
    mut ws_tx: SplitSink<WebSocket, Message>,
) {
    loop {
        tokio::select! {
            biased;
            msg = outbound.recv() => match msg {
                Some(text) => {
                    if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                        debug!(conn_id = %handle.id, error = %e, "WebSocket write failed");
                        handle.mark_closed();
                        return;
                    }
                }
                None => break,
            },
            () = handle.closed() => break,
        }
    }

    while let Ok(text) = outbound.try_recv() {
        if ws_tx.send(Message::Text(text.into())).await.is_err() {
            return;
        }
    }
    let _ = ws_tx.send(Message::Close(None)).await;
}
