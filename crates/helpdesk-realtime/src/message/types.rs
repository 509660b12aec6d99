//! Frame type tags and the closed set of client-originated frames.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::presence::status::UserStatus;

/// Value of the envelope's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    /// Chat message relayed to a room.
    ChatMessage,
    /// A user started or stopped typing.
    TypingIndicator,
    /// A connection joined a room.
    UserJoined,
    /// A connection left a room.
    UserLeft,
    /// Per-user notification.
    Notification,
    /// Presence status change.
    StatusUpdate,
    /// Operator broadcast to a room or everyone.
    SystemAlert,
    /// Receipt for a frame that required one.
    Acknowledgment,
    /// Client keepalive.
    Heartbeat,
    /// Error reply to the offending connection.
    Error,
}

impl FrameType {
    /// Parses the wire tag. Returns `None` for unknown tags.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "chat_message" => Some(Self::ChatMessage),
            "typing_indicator" => Some(Self::TypingIndicator),
            "user_joined" => Some(Self::UserJoined),
            "user_left" => Some(Self::UserLeft),
            "notification" => Some(Self::Notification),
            "status_update" => Some(Self::StatusUpdate),
            "system_alert" => Some(Self::SystemAlert),
            "acknowledgment" => Some(Self::Acknowledgment),
            "heartbeat" => Some(Self::Heartbeat),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatMessage => "chat_message",
            Self::TypingIndicator => "typing_indicator",
            Self::UserJoined => "user_joined",
            Self::UserLeft => "user_left",
            Self::Notification => "notification",
            Self::StatusUpdate => "status_update",
            Self::SystemAlert => "system_alert",
            Self::Acknowledgment => "acknowledgment",
            Self::Heartbeat => "heartbeat",
            Self::Error => "error",
        }
    }
}

/// `data.action` of a typing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingAction {
    /// User began typing.
    StartTyping,
    /// User stopped typing.
    StopTyping,
}

impl TypingAction {
    /// Parses the wire value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "start_typing" => Some(Self::StartTyping),
            "stop_typing" => Some(Self::StopTyping),
            _ => None,
        }
    }

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartTyping => "start_typing",
            Self::StopTyping => "stop_typing",
        }
    }
}

/// Frames a client may send. Anything else is dropped before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Keepalive.
    Heartbeat,
    /// Chat payload for the connection's room.
    ChatMessage {
        /// Opaque message body, relayed as-is.
        data: Map<String, Value>,
    },
    /// Typing start/stop.
    Typing {
        /// Requested action.
        action: TypingAction,
    },
    /// Receipt for a previously delivered frame.
    Acknowledgment {
        /// Id of the acknowledged frame.
        message_id: String,
    },
    /// Presence change for the connection's user.
    StatusUpdate {
        /// New status.
        status: UserStatus,
        /// Extra fields merged into the user's presence metadata.
        metadata: Map<String, Value>,
    },
}
