//! Errors raised inside the realtime subsystem.
//!
//! None of these cross the subsystem boundary as failures: decode errors
//! are answered with an `error` frame, send errors unregister the peer.

use thiserror::Error;

/// Failure to turn raw inbound bytes into an [`InboundFrame`](crate::message::InboundFrame).
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame had no content.
    #[error("Empty message")]
    Empty,
    /// The frame exceeded the configured size limit.
    #[error("Message exceeds maximum size of {max} bytes")]
    TooLarge {
        /// Configured limit.
        max: usize,
    },
    /// The frame was not a valid JSON envelope.
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A field required by this frame type was absent.
    #[error("Missing field '{0}'")]
    MissingField(&'static str),
    /// A field carried a value outside its allowed set.
    #[error("Invalid {field}: {value}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Chat frames were sent on a connection that never joined a room.
    #[error("User ID and Room ID required for chat messages")]
    RoomRequired,
}

/// Failure to enqueue an outbound frame for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The receiving half was dropped (socket closed).
    #[error("connection closed")]
    Closed,
    /// The outbound queue is full (slow peer).
    #[error("outbound queue full")]
    Full,
}
