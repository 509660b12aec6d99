//! System alert broadcast.

use axum::Json;
use axum::extract::State;

use helpdesk_core::error::AppError;

use crate::dto::request::SystemAlertRequest;
use crate::dto::response::{AlertResponse, ApiResponse};
use crate::extractors::ValidatedJson;
use crate::extractors::path::parse_room_id;
use crate::state::AppState;

/// POST /api/alerts
pub async fn broadcast_alert(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SystemAlertRequest>,
) -> Result<Json<ApiResponse<AlertResponse>>, AppError> {
    let room_id = req.room_id.as_deref().map(parse_room_id).transpose()?;

    let delivered = state.realtime.notifications.broadcast_system_alert(
        &req.title,
        &req.message,
        req.priority,
        room_id.as_ref(),
    );
    Ok(Json(ApiResponse::ok(AlertResponse { delivered })))
}
