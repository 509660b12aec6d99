//! Room-scoped queries: presence, connected users, typists, and history.

use axum::Json;
use axum::extract::{Path, Query, State};

use helpdesk_core::error::AppError;
use helpdesk_realtime::connection::ConnectionInfo;
use helpdesk_realtime::message::Frame;
use helpdesk_realtime::presence::UserPresence;

use crate::dto::request::HistoryQuery;
use crate::dto::response::{ApiResponse, RoomUsersResponse, TypingResponse};
use crate::extractors::path::parse_room_id;
use crate::state::AppState;

/// GET /api/rooms/{room_id}/presence
pub async fn room_presence(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<UserPresence>>>, AppError> {
    let room_id = parse_room_id(&room_id)?;
    Ok(Json(ApiResponse::ok(
        state.realtime.presence.room_presence(&room_id),
    )))
}

/// GET /api/rooms/{room_id}/users
pub async fn room_users(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<RoomUsersResponse>>, AppError> {
    let room_id = parse_room_id(&room_id)?;
    let users: Vec<String> = state
        .realtime
        .connections
        .room_users(&room_id)
        .into_iter()
        .map(|u| u.as_str().to_owned())
        .collect();

    Ok(Json(ApiResponse::ok(RoomUsersResponse {
        room_id: room_id.as_str().to_owned(),
        count: users.len(),
        users,
    })))
}

/// GET /api/rooms/{room_id}/connections
pub async fn room_connections(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ConnectionInfo>>>, AppError> {
    let room_id = parse_room_id(&room_id)?;
    let mut connections: Vec<ConnectionInfo> = state
        .realtime
        .connections
        .room_connections(&room_id)
        .iter()
        .map(|handle| handle.info())
        .collect();
    connections.sort_by_key(|c| c.connected_at);
    Ok(Json(ApiResponse::ok(connections)))
}

/// GET /api/rooms/{room_id}/typing
pub async fn room_typing(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<TypingResponse>>, AppError> {
    let room_id = parse_room_id(&room_id)?;
    let typing_users = state
        .realtime
        .typing
        .current_typists(&room_id)
        .into_iter()
        .map(|u| u.as_str().to_owned())
        .collect();

    Ok(Json(ApiResponse::ok(TypingResponse {
        room_id: room_id.as_str().to_owned(),
        typing_users,
    })))
}

/// GET /api/rooms/{room_id}/history?limit=
pub async fn room_history(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Frame>>>, AppError> {
    let room_id = parse_room_id(&room_id)?;
    let limit = query
        .limit
        .map(|l| l.min(state.realtime.config.room_history_limit));
    Ok(Json(ApiResponse::ok(
        state.realtime.router.room_history(&room_id, limit),
    )))
}
