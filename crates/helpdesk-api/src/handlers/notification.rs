//! Notification handlers.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use helpdesk_core::error::AppError;
use helpdesk_realtime::notification::{NewNotification, Notification};

use crate::dto::request::{CreateNotificationRequest, NotificationListQuery};
use crate::dto::response::{ApiResponse, CountResponse, MarkedResponse, NotificationCreatedResponse};
use crate::extractors::ValidatedJson;
use crate::extractors::path::{parse_notification_id, parse_user_id};
use crate::state::AppState;

/// GET /api/notifications/{user_id}?unread_only=&limit=
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<NotificationListQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let notifications =
        state
            .realtime
            .notifications
            .list(&user_id, params.unread_only, params.limit);
    Ok(Json(ApiResponse::ok(notifications)))
}

/// POST /api/notifications/{user_id}
pub async fn create_notification(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NotificationCreatedResponse>>), AppError> {
    let user_id = parse_user_id(&user_id)?;
    let new = NewNotification {
        title: req.title,
        message: req.message,
        priority: req.priority,
        data: req.data,
        ttl: req
            .expires_in_minutes
            .map(|minutes| Duration::from_secs(minutes * 60)),
    };

    let id = state.realtime.notifications.enqueue(&user_id, new);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(NotificationCreatedResponse {
            notification_id: id.to_string(),
        })),
    ))
}

/// GET /api/notifications/{user_id}/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let count = state.realtime.notifications.unread_count(&user_id);
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{user_id}/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<MarkedResponse>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let id = parse_notification_id(&id)?;

    if !state.realtime.notifications.mark_read(&user_id, &id) {
        return Err(AppError::not_found(format!("Notification {id} not found")));
    }
    Ok(Json(ApiResponse::ok(MarkedResponse { marked: 1 })))
}

/// PUT /api/notifications/{user_id}/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<MarkedResponse>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let marked = state.realtime.notifications.mark_all_read(&user_id);
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}
