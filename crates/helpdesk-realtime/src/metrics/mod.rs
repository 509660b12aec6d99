//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections established
    connections_total: AtomicU64,
    /// Connections currently registered
    connections_active: AtomicU64,
    /// Frames received from clients
    frames_received: AtomicU64,
    /// Frames rejected with an error reply
    frames_rejected: AtomicU64,
    /// Frames enqueued for delivery
    frames_sent: AtomicU64,
    /// Frames dropped because a peer queue was full
    frames_dropped: AtomicU64,
    /// Chat messages relayed
    chat_messages: AtomicU64,
    /// Acknowledgments recorded
    acknowledgments: AtomicU64,
    /// Notifications stored
    notifications_enqueued: AtomicU64,
    /// System alerts broadcast
    system_alerts: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection
    pub fn record_connect(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a disconnection
    pub fn record_disconnect(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record a frame received from a client
    pub fn record_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame answered with an error
    pub fn record_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record frames enqueued to peers
    pub fn record_sent(&self, count: u64) {
        self.frames_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a frame dropped on a full queue
    pub fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a relayed chat message
    pub fn record_chat(&self) {
        self.chat_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an acknowledgment
    pub fn record_ack(&self) {
        self.acknowledgments.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored notification
    pub fn record_notification(&self) {
        self.notifications_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a system alert
    pub fn record_alert(&self) {
        self.system_alerts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            chat_messages: self.chat_messages.load(Ordering::Relaxed),
            acknowledgments: self.acknowledgments.load(Ordering::Relaxed),
            notifications_enqueued: self.notifications_enqueued.load(Ordering::Relaxed),
            system_alerts: self.system_alerts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever established
    pub connections_total: u64,
    /// Currently registered connections
    pub connections_active: u64,
    /// Frames received from clients
    pub frames_received: u64,
    /// Frames answered with an error
    pub frames_rejected: u64,
    /// Frames enqueued to peers
    pub frames_sent: u64,
    /// Frames dropped on full queues
    pub frames_dropped: u64,
    /// Chat messages relayed
    pub chat_messages: u64,
    /// Acknowledgments recorded
    pub acknowledgments: u64,
    /// Notifications stored
    pub notifications_enqueued: u64,
    /// System alerts broadcast
    pub system_alerts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_connections_never_underflow() {
        let metrics = EngineMetrics::new();
        metrics.record_connect();
        metrics.record_disconnect();
        metrics.record_disconnect();
        let snap = metrics.snapshot();
        assert_eq!(snap.connections_total, 1);
        assert_eq!(snap.connections_active, 0);
    }
}
