//! Message router, the single entry point for client frames.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use helpdesk_core::types::{ConnectionId, NotificationId, RoomId};

use crate::connection::{ConnectionHandle, ConnectionRegistry};
use crate::error::FrameError;
use crate::message::builder::{build_chat_message, build_error};
use crate::message::codec::decode_inbound;
use crate::message::{Frame, InboundFrame, TypingAction};
use crate::metrics::EngineMetrics;
use crate::notification::NotificationStore;
use crate::presence::{PresenceTracker, UserStatus};
use crate::typing::TypingTracker;

use super::acks::{AckLedger, InFlightMessage};
use super::history::RoomHistory;

/// Default number of frames returned by [`MessageRouter::room_history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Decodes client frames and hands each kind to one collaborator.
///
/// Decode and handler failures are answered with an `error` frame to the
/// offending connection only.
#[derive(Debug)]
pub struct MessageRouter {
    registry: Arc<ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    typing: Arc<TypingTracker>,
    notifications: Arc<NotificationStore>,
    metrics: Arc<EngineMetrics>,
    history: RoomHistory,
    acks: AckLedger,
    max_frame_bytes: usize,
}

impl MessageRouter {
    /// Creates a new router.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        presence: Arc<PresenceTracker>,
        typing: Arc<TypingTracker>,
        notifications: Arc<NotificationStore>,
        metrics: Arc<EngineMetrics>,
        history: RoomHistory,
        acks: AckLedger,
        max_frame_bytes: usize,
    ) -> Self {
        Self {
            registry,
            presence,
            typing,
            notifications,
            metrics,
            history,
            acks,
            max_frame_bytes,
        }
    }

    /// Handles one raw frame from a connection.
    pub fn handle_frame(&self, conn_id: &ConnectionId, raw: &[u8]) {
        let Some(handle) = self.registry.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return;
        };
        self.metrics.record_received();

        let frame = match decode_inbound(raw, self.max_frame_bytes) {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                self.reject(&handle, &e);
                return;
            }
        };

        let result = match frame {
            InboundFrame::Heartbeat => {
                self.on_heartbeat(&handle);
                Ok(())
            }
            InboundFrame::ChatMessage { data } => self.on_chat(&handle, data),
            InboundFrame::Typing { action } => {
                self.on_typing(&handle, action);
                Ok(())
            }
            InboundFrame::Acknowledgment { message_id } => {
                self.on_ack(&handle, &message_id);
                Ok(())
            }
            InboundFrame::StatusUpdate { status, metadata } => {
                self.on_status(&handle, status, metadata);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.reject(&handle, &e);
        }
    }

    /// Recent chat frames for a room, oldest first.
    pub fn room_history(&self, room_id: &RoomId, limit: Option<usize>) -> Vec<Frame> {
        self.history
            .recent(room_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    /// Acknowledgment state of a relayed chat message.
    pub fn acknowledgments(&self, message_id: &str) -> Option<InFlightMessage> {
        self.acks.get(message_id)
    }

    fn on_heartbeat(&self, handle: &ConnectionHandle) {
        self.registry.touch_heartbeat(&handle.id);
        self.presence
            .update(&handle.user_id, UserStatus::Online, None, None, None);
    }

    fn on_chat(&self, handle: &ConnectionHandle, data: Map<String, Value>) -> Result<(), FrameError> {
        let room = handle.room_id.as_ref().ok_or(FrameError::RoomRequired)?;

        let frame = build_chat_message(&handle.user_id, room, data);
        self.history.push(room, frame.clone());
        self.acks.track(InFlightMessage {
            message_id: frame.message_id.clone(),
            sender_id: handle.user_id.clone(),
            room_id: room.clone(),
            payload: frame.data.clone(),
            requires_ack: frame.requires_ack,
            acknowledged_by: HashSet::new(),
            created_at: Utc::now(),
        });

        let delivered = self.registry.broadcast_room(room, &frame, None);
        self.metrics.record_chat();
        debug!(
            conn_id = %handle.id,
            room_id = %room,
            message_id = %frame.message_id,
            delivered,
            "Chat message relayed"
        );

        self.typing.stop_typing(&handle.user_id, room);
        Ok(())
    }

    fn on_typing(&self, handle: &ConnectionHandle, action: TypingAction) {
        let Some(room) = &handle.room_id else {
            debug!(conn_id = %handle.id, "Typing indicator without a room ignored");
            return;
        };
        match action {
            TypingAction::StartTyping => self.typing.start_typing(&handle.user_id, room),
            TypingAction::StopTyping => self.typing.stop_typing(&handle.user_id, room),
        };
    }

    /// Chat acks go to the ledger; a notification ack marks the
    /// notification read in the acknowledging user's inbox.
    fn on_ack(&self, handle: &ConnectionHandle, message_id: &str) {
        let acked = self.acks.acknowledge(message_id, handle.id)
            || message_id
                .parse::<NotificationId>()
                .is_ok_and(|id| self.notifications.mark_read(&handle.user_id, &id));

        if acked {
            self.metrics.record_ack();
        } else {
            debug!(conn_id = %handle.id, message_id = %message_id, "Acknowledgment for unknown message");
        }
    }

    fn on_status(&self, handle: &ConnectionHandle, status: UserStatus, metadata: Map<String, Value>) {
        self.presence.update(
            &handle.user_id,
            status,
            handle.room_id.as_ref(),
            None,
            Some(metadata),
        );
    }

    fn reject(&self, handle: &ConnectionHandle, error: &FrameError) {
        warn!(conn_id = %handle.id, error = %error, "Rejected client frame");
        self.metrics.record_rejected();
        self.registry.send(&handle.id, &build_error(&error.to_string()));
    }
}
