//! Typed path parameter helpers.

use helpdesk_core::error::AppError;
use helpdesk_core::types::{NotificationId, RoomId, UserId};
use helpdesk_realtime::message::validator::validate_identifier;

/// Parses a notification id from a path segment.
pub fn parse_notification_id(s: &str) -> Result<NotificationId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid notification id: {s}")))
}

/// Validates a user id from a path or query parameter.
pub fn parse_user_id(s: &str) -> Result<UserId, AppError> {
    validate_identifier("user_id", s)?;
    Ok(UserId::from(s))
}

/// Validates a room id from a path or query parameter.
pub fn parse_room_id(s: &str) -> Result<RoomId, AppError> {
    validate_identifier("room_id", s)?;
    Ok(RoomId::from(s))
}
