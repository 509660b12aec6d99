//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use helpdesk_core::config::RealtimeConfig;

use crate::connection::ConnectionRegistry;
use crate::metrics::EngineMetrics;
use crate::notification::NotificationStore;
use crate::presence::PresenceTracker;
use crate::routing::{AckLedger, MessageRouter, RoomHistory};
use crate::typing::TypingTracker;

/// Central real-time engine that coordinates all WebSocket subsystems.
///
/// Built once per process and injected where needed. Independent engines
/// share no state.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub connections: Arc<ConnectionRegistry>,
    /// Presence tracker.
    pub presence: Arc<PresenceTracker>,
    /// Typing indicators.
    pub typing: Arc<TypingTracker>,
    /// Notification store.
    pub notifications: Arc<NotificationStore>,
    /// Inbound frame router.
    pub router: Arc<MessageRouter>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    /// Configuration.
    pub config: Arc<RealtimeConfig>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let presence = Arc::new(PresenceTracker::new(config.presence_history_limit));
        let connections = Arc::new(ConnectionRegistry::new(
            config.channel_buffer_size,
            presence.clone(),
            metrics.clone(),
        ));
        let typing = Arc::new(TypingTracker::new(
            connections.clone(),
            config.typing_stale_after(),
        ));
        let notifications = Arc::new(NotificationStore::new(
            config.notifications.clone(),
            connections.clone(),
            metrics.clone(),
        ));
        let router = Arc::new(MessageRouter::new(
            connections.clone(),
            presence.clone(),
            typing.clone(),
            notifications.clone(),
            metrics.clone(),
            RoomHistory::new(config.room_history_limit),
            AckLedger::new(config.ack_ledger_capacity),
            config.max_frame_bytes,
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            presence,
            typing,
            notifications,
            router,
            metrics,
            config: Arc::new(config),
        }
    }

    /// Closes every connection. Returns how many were open.
    pub fn shutdown(&self) -> usize {
        info!("Shutting down real-time engine");
        let closed = self.connections.close_all();
        info!(closed, "Real-time engine shut down");
        closed
    }
}

#[cfg(test)]
mod tests {
    use helpdesk_core::types::{RoomId, UserId};

    use super::*;

    #[test]
    fn test_engines_are_isolated() {
        let first = RealtimeEngine::new(RealtimeConfig::default());
        let second = RealtimeEngine::new(RealtimeConfig::default());

        let (_conn, _rx) = first
            .connections
            .register(UserId::from("alice"), Some(RoomId::from("support-1")));

        assert_eq!(first.connections.connection_count(), 1);
        assert_eq!(second.connections.connection_count(), 0);
        assert!(second.presence.get(&UserId::from("alice")).is_none());

        assert_eq!(first.shutdown(), 1);
        assert_eq!(first.metrics.snapshot().connections_active, 0);
    }
}
