//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use helpdesk_realtime::notification::NotificationPriority;

/// Query string of the WebSocket upgrade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsQuery {
    /// Connecting user.
    pub user_id: String,
    /// Room to join, if any.
    pub room_id: Option<String>,
}

/// Body of `POST /api/notifications/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
    /// Priority, `normal` when omitted.
    #[serde(default)]
    pub priority: NotificationPriority,
    /// Extra data passed through to the client.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Minutes until the notification expires.
    #[validate(range(min = 1, max = 43200))]
    pub expires_in_minutes: Option<u64>,
}

/// Body of `POST /api/alerts`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SystemAlertRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    /// Priority, `high` when omitted.
    #[serde(default = "default_alert_priority")]
    pub priority: NotificationPriority,
    /// Target room, or everyone when omitted.
    #[validate(length(min = 1, max = 128))]
    pub room_id: Option<String>,
}

fn default_alert_priority() -> NotificationPriority {
    NotificationPriority::High
}

/// Query string of the notification listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationListQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Page size.
    pub limit: Option<usize>,
}

/// Query string of the room history listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Number of most recent frames.
    pub limit: Option<usize>,
}
