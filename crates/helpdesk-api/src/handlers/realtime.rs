//! Real-time engine statistics.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, RealtimeStatsResponse};
use crate::state::AppState;

/// GET /api/realtime/stats
pub async fn stats(State(state): State<AppState>) -> Json<ApiResponse<RealtimeStatsResponse>> {
    let engine = &state.realtime;

    Json(ApiResponse::ok(RealtimeStatsResponse {
        ws_connections: engine.connections.connection_count(),
        connected_users: engine.connections.user_count(None),
        active_rooms: engine.connections.room_count(),
        online_users: engine.presence.online_count(),
        metrics: engine.metrics.snapshot(),
    }))
}
