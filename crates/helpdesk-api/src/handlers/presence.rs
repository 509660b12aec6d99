//! Presence handlers.

use axum::Json;
use axum::extract::{Path, State};

use helpdesk_core::error::AppError;
use helpdesk_realtime::presence::{StatusChange, UserPresence};

use crate::dto::response::{ApiResponse, OnlineUsersResponse};
use crate::extractors::path::parse_user_id;
use crate::state::AppState;

/// GET /api/presence/online
pub async fn online_users(State(state): State<AppState>) -> Json<ApiResponse<OnlineUsersResponse>> {
    let users = state.realtime.presence.online_users();
    Json(ApiResponse::ok(OnlineUsersResponse {
        count: users.len(),
        users,
    }))
}

/// GET /api/presence/users/{user_id}
pub async fn get_user_presence(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserPresence>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let presence = state
        .realtime
        .presence
        .get(&user_id)
        .ok_or_else(|| AppError::not_found(format!("No presence for user {user_id}")))?;
    Ok(Json(ApiResponse::ok(presence)))
}

/// GET /api/presence/users/{user_id}/history
pub async fn get_user_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<StatusChange>>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(ApiResponse::ok(state.realtime.presence.history(&user_id))))
}
