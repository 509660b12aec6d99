//! Route definitions for the helpdesk HTTP API.
//!
//! REST routes are grouped by domain and mounted under `/api`; the
//! WebSocket upgrade lives at `/ws`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with every route and the request logger.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(realtime_routes())
        .merge(presence_routes())
        .merge(room_routes())
        .merge(notification_routes())
        .merge(alert_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

fn realtime_routes() -> Router<AppState> {
    Router::new().route("/realtime/stats", get(handlers::realtime::stats))
}

fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/online", get(handlers::presence::online_users))
        .route(
            "/presence/users/{user_id}",
            get(handlers::presence::get_user_presence),
        )
        .route(
            "/presence/users/{user_id}/history",
            get(handlers::presence::get_user_history),
        )
}

fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms/{room_id}/presence", get(handlers::rooms::room_presence))
        .route("/rooms/{room_id}/users", get(handlers::rooms::room_users))
        .route(
            "/rooms/{room_id}/connections",
            get(handlers::rooms::room_connections),
        )
        .route("/rooms/{room_id}/typing", get(handlers::rooms::room_typing))
        .route("/rooms/{room_id}/history", get(handlers::rooms::room_history))
}

/// Per-user inbox. `read-all` and `unread-count` are literal segments and
/// take precedence over the `{id}` capture.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/{user_id}",
            get(handlers::notification::list_notifications)
                .post(handlers::notification::create_notification),
        )
        .route(
            "/notifications/{user_id}/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{user_id}/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{user_id}/{id}/read",
            put(handlers::notification::mark_read),
        )
}

fn alert_routes() -> Router<AppState> {
    Router::new().route("/alerts", post(handlers::alert::broadcast_alert))
}
