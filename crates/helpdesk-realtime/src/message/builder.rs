//! Builder helpers for constructing outbound frames.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use helpdesk_core::types::{RoomId, UserId};

use crate::notification::priority::NotificationPriority;

use super::envelope::Frame;
use super::types::{FrameType, TypingAction};

/// Sender id used for server-originated frames.
pub const SYSTEM_SENDER: &str = "system";

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `user_joined` for the given room.
pub fn build_user_joined(user_id: &UserId, room_id: &RoomId) -> Frame {
    Frame::new(
        FrameType::UserJoined,
        object(json!({ "user_id": user_id, "timestamp": Utc::now() })),
    )
    .in_room(room_id.as_str())
}

/// `user_left` for the given room.
pub fn build_user_left(user_id: &UserId, room_id: &RoomId) -> Frame {
    Frame::new(
        FrameType::UserLeft,
        object(json!({ "user_id": user_id, "timestamp": Utc::now() })),
    )
    .in_room(room_id.as_str())
}

/// `typing_indicator` with `action=start_typing|stop_typing`.
pub fn build_typing(user_id: &UserId, room_id: &RoomId, action: TypingAction) -> Frame {
    Frame::new(
        FrameType::TypingIndicator,
        object(json!({
            "user_id": user_id,
            "action": action.as_str(),
            "timestamp": Utc::now(),
        })),
    )
    .from_sender(user_id.as_str())
    .in_room(room_id.as_str())
}

/// Relayed chat message. Always requires acknowledgment.
pub fn build_chat_message(sender: &UserId, room_id: &RoomId, data: Map<String, Value>) -> Frame {
    Frame::new(FrameType::ChatMessage, data)
        .from_sender(sender.as_str())
        .in_room(room_id.as_str())
        .with_ack(true)
}

/// Live delivery of a stored notification. The frame id is the
/// notification id, so acknowledging the frame marks it read.
pub fn build_notification(
    notification_id: &str,
    title: &str,
    message: &str,
    priority: NotificationPriority,
    data: &Map<String, Value>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> Frame {
    Frame::new(
        FrameType::Notification,
        object(json!({
            "notification_id": notification_id,
            "title": title,
            "message": message,
            "priority": priority.as_str(),
            "data": data,
            "created_at": created_at,
            "expires_at": expires_at,
        })),
    )
    .with_message_id(notification_id)
    .from_sender(SYSTEM_SENDER)
    .with_ack(priority.requires_ack())
}

/// Operator alert. Only critical alerts require acknowledgment.
pub fn build_system_alert(
    alert_id: &str,
    title: &str,
    message: &str,
    priority: NotificationPriority,
    room_id: Option<&RoomId>,
) -> Frame {
    let frame = Frame::new(
        FrameType::SystemAlert,
        object(json!({
            "alert_id": alert_id,
            "title": title,
            "message": message,
            "priority": priority.as_str(),
            "timestamp": Utc::now(),
        })),
    )
    .from_sender(SYSTEM_SENDER)
    .with_ack(priority == NotificationPriority::Critical);

    match room_id {
        Some(room) => frame.in_room(room.as_str()),
        None => frame,
    }
}

/// `error` reply to a single connection.
pub fn build_error(message: &str) -> Frame {
    Frame::new(
        FrameType::Error,
        object(json!({ "error": message, "timestamp": Utc::now() })),
    )
    .from_sender(SYSTEM_SENDER)
}
