//! JSON encoding of outbound frames and decoding of inbound frames.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FrameError;
use crate::presence::status::UserStatus;

use super::envelope::Frame;
use super::types::{FrameType, InboundFrame, TypingAction};
use super::validator::validate_inbound;

/// Loose inbound envelope. Clients only have to send `type`.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Serialize an outbound frame.
pub fn encode(frame: &Frame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}

/// Decode raw bytes from a client.
///
/// Returns `Ok(None)` for well-formed frames whose type is unknown or not
/// accepted from clients; those are logged and dropped by the caller.
pub fn decode_inbound(raw: &[u8], max_bytes: usize) -> Result<Option<InboundFrame>, FrameError> {
    validate_inbound(raw, max_bytes)?;

    let raw: RawFrame = serde_json::from_slice(raw)?;
    let data = match raw.data {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let Some(kind) = FrameType::parse(&raw.kind) else {
        tracing::warn!(frame_type = %raw.kind, "Dropping frame with unknown type");
        return Ok(None);
    };

    let frame = match kind {
        FrameType::Heartbeat => InboundFrame::Heartbeat,
        FrameType::ChatMessage => InboundFrame::ChatMessage { data },
        FrameType::TypingIndicator => {
            let value = required_str(&data, "action")?;
            let action = TypingAction::parse(value).ok_or_else(|| FrameError::InvalidField {
                field: "action",
                value: value.to_string(),
            })?;
            InboundFrame::Typing { action }
        }
        FrameType::Acknowledgment => InboundFrame::Acknowledgment {
            message_id: required_str(&data, "message_id")?.to_string(),
        },
        FrameType::StatusUpdate => {
            let value = required_str(&data, "status")?;
            let status = UserStatus::parse(value).ok_or_else(|| FrameError::InvalidField {
                field: "status",
                value: value.to_string(),
            })?;
            let metadata = match data.get("metadata") {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            };
            InboundFrame::StatusUpdate { status, metadata }
        }
        FrameType::UserJoined
        | FrameType::UserLeft
        | FrameType::Notification
        | FrameType::SystemAlert
        | FrameType::Error => {
            tracing::warn!(frame_type = kind.as_str(), "Dropping server-only frame sent by client");
            return Ok(None);
        }
    };

    Ok(Some(frame))
}

fn required_str<'a>(data: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, FrameError> {
    data.get(field)
        .and_then(Value::as_str)
        .ok_or(FrameError::MissingField(field))
}
