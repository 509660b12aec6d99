//! Response DTOs.

use serde::{Deserialize, Serialize};

use helpdesk_realtime::metrics::MetricsSnapshot;
use helpdesk_realtime::presence::UserPresence;

pub use helpdesk_core::types::response::ApiResponse;

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Liveness plus real-time counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Status string.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Distinct connected users.
    pub connected_users: usize,
    /// Rooms with at least one connection.
    pub active_rooms: usize,
    /// Users whose presence is not offline.
    pub online_users: usize,
}

/// Real-time engine statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeStatsResponse {
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Distinct connected users.
    pub connected_users: usize,
    /// Rooms with at least one connection.
    pub active_rooms: usize,
    /// Users whose presence is not offline.
    pub online_users: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}

/// Online users listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    /// Number of users.
    pub count: usize,
    /// Presence of each user.
    pub users: Vec<UserPresence>,
}

/// Users connected to a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUsersResponse {
    /// Room.
    pub room_id: String,
    /// Distinct user ids.
    pub users: Vec<String>,
    /// Number of users.
    pub count: usize,
}

/// Users typing in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingResponse {
    /// Room.
    pub room_id: String,
    /// Users currently typing.
    pub typing_users: Vec<String>,
}

/// Generic count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count.
    pub count: usize,
}

/// Result of a mark-read operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Notifications marked read.
    pub marked: usize,
}

/// Id of a newly stored notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreatedResponse {
    /// Notification id.
    pub notification_id: String,
}

/// Result of a system alert broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    /// Connections the alert was delivered to.
    pub delivered: usize,
}
