//! Real-time WebSocket engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound frame queue size per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Connections without a heartbeat for this long are dropped.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_seconds: u64,
    /// Interval between background sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Users unseen for this long are forced offline.
    #[serde(default = "default_presence_offline_timeout")]
    pub presence_offline_timeout_minutes: u64,
    /// Status-change records retained per user.
    #[serde(default = "default_presence_history")]
    pub presence_history_limit: usize,
    /// Typing indicators older than this are stale.
    #[serde(default = "default_typing_stale")]
    pub typing_stale_seconds: u64,
    /// Chat frames retained per room for backfill.
    #[serde(default = "default_room_history")]
    pub room_history_limit: usize,
    /// In-flight chat messages tracked for acknowledgment.
    #[serde(default = "default_ack_capacity")]
    pub ack_ledger_capacity: usize,
    /// Largest inbound frame accepted, in bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Largest WebSocket message the transport will read before dropping
    /// the connection. Frames between `max_frame_bytes` and this cap are
    /// answered with an error frame instead.
    #[serde(default = "default_max_transport_bytes")]
    pub max_transport_bytes: usize,
    /// Notification-specific settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            heartbeat_timeout_seconds: default_heartbeat_timeout(),
            sweep_interval_seconds: default_sweep_interval(),
            presence_offline_timeout_minutes: default_presence_offline_timeout(),
            presence_history_limit: default_presence_history(),
            typing_stale_seconds: default_typing_stale(),
            room_history_limit: default_room_history(),
            ack_ledger_capacity: default_ack_capacity(),
            max_frame_bytes: default_max_frame_bytes(),
            max_transport_bytes: default_max_transport_bytes(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl RealtimeConfig {
    /// Heartbeat timeout as a duration.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_seconds)
    }

    /// Sweep interval as a duration (never zero).
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }

    /// Presence inactivity timeout as a duration.
    pub fn presence_offline_timeout(&self) -> Duration {
        Duration::from_secs(self.presence_offline_timeout_minutes * 60)
    }

    /// Typing staleness window as a duration.
    pub fn typing_stale_after(&self) -> Duration {
        Duration::from_secs(self.typing_stale_seconds)
    }

    /// Transport read limit, never below the frame limit.
    pub fn transport_message_limit(&self) -> usize {
        self.max_transport_bytes.max(self.max_frame_bytes)
    }
}

/// Notification storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum stored notifications per user; oldest are dropped first.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: usize,
    /// Page size used when a listing does not specify one.
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_stored_per_user: default_max_stored(),
            default_list_limit: default_list_limit(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_heartbeat_timeout() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    30
}

fn default_presence_offline_timeout() -> u64 {
    30
}

fn default_presence_history() -> usize {
    50
}

fn default_typing_stale() -> u64 {
    10
}

fn default_room_history() -> usize {
    1000
}

fn default_ack_capacity() -> usize {
    10_000
}

fn default_max_frame_bytes() -> usize {
    65_536
}

fn default_max_transport_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_max_stored() -> usize {
    100
}

fn default_list_limit() -> usize {
    50
}
