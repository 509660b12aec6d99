//! The JSON envelope carried by every WebSocket frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::types::FrameType;

/// One WebSocket frame.
///
/// Wire shape: `message_id`, `type`, `data`, `sender_id`, `room_id`,
/// `timestamp` (ISO-8601), `requires_ack`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Unique id, used for acknowledgment.
    pub message_id: String,
    /// Frame kind.
    #[serde(rename = "type")]
    pub kind: FrameType,
    /// Kind-specific payload.
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Originating user, or `"system"`.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Room scope, if any.
    #[serde(default)]
    pub room_id: Option<String>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Whether the receiver should send an `acknowledgment`.
    #[serde(default)]
    pub requires_ack: bool,
}

impl Frame {
    /// Creates a frame with a fresh id and the current time.
    pub fn new(kind: FrameType, data: Map<String, Value>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            kind,
            data,
            sender_id: None,
            room_id: None,
            timestamp: Utc::now(),
            requires_ack: false,
        }
    }

    /// Replaces the generated id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Sets the sender.
    pub fn from_sender(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Scopes the frame to a room.
    pub fn in_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Marks whether the frame expects an acknowledgment.
    pub fn with_ack(mut self, requires_ack: bool) -> Self {
        self.requires_ack = requires_ack;
        self
    }

    /// Reads a string field from `data`.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
