//! Connection registry, handling connection lifecycle and frame fan-out.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use helpdesk_core::types::{ConnectionId, RoomId, UserId};

use crate::error::SendError;
use crate::message::Frame;
use crate::message::builder::{build_user_joined, build_user_left};
use crate::message::codec::encode;
use crate::metrics::EngineMetrics;
use crate::presence::{PresenceTracker, UserStatus};

use super::handle::ConnectionHandle;
use super::heartbeat::is_stale;
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
///
/// Delivery is at most once and best effort. Membership is snapshotted
/// before each fan-out, so no lock is held while frames are enqueued.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Connection pool.
    pool: ConnectionPool,
    /// Presence tracker.
    presence: Arc<PresenceTracker>,
    /// Metrics.
    metrics: Arc<EngineMetrics>,
    /// Outbound queue size per connection.
    buffer_size: usize,
}

impl ConnectionRegistry {
    /// Creates a new connection registry.
    pub fn new(
        buffer_size: usize,
        presence: Arc<PresenceTracker>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            presence,
            metrics,
            buffer_size: buffer_size.max(1),
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the connection handle and a receiver for encoded outbound frames.
    /// The user is marked online and other members of the room are told.
    pub fn register(
        &self,
        user_id: UserId,
        room_id: Option<RoomId>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, room_id, tx));

        self.pool.add(handle.clone());
        self.metrics.record_connect();
        self.presence.update(
            &handle.user_id,
            UserStatus::Online,
            handle.room_id.as_ref(),
            Some(handle.id),
            None,
        );

        info!(
            conn_id = %handle.id,
            user_id = %handle.user_id,
            room_id = ?handle.room_id.as_ref().map(RoomId::as_str),
            "WebSocket connection registered"
        );

        if let Some(room) = &handle.room_id {
            let joined = build_user_joined(&handle.user_id, room);
            self.broadcast_room(room, &joined, Some(handle.id));
        }

        (handle, rx)
    }

    /// Unregisters a connection. Returns `false` if it was already gone.
    pub fn unregister(&self, conn_id: &ConnectionId) -> bool {
        let Some(handle) = self.pool.remove(conn_id) else {
            return false;
        };

        handle.mark_closed();
        self.metrics.record_disconnect();

        info!(
            conn_id = %conn_id,
            user_id = %handle.user_id,
            "WebSocket connection unregistered"
        );

        if let Some(room) = &handle.room_id {
            let left = build_user_left(&handle.user_id, room);
            self.broadcast_room(room, &left, None);
        }

        true
    }

    /// Sends a frame to one connection.
    pub fn send(&self, conn_id: &ConnectionId, frame: &Frame) -> bool {
        let Some(handle) = self.pool.get(conn_id) else {
            debug!(conn_id = %conn_id, "Send to unknown connection");
            return false;
        };
        self.deliver(vec![handle], frame) == 1
    }

    /// Sends a frame to every connection of a user.
    pub fn send_to_user(&self, user_id: &UserId, frame: &Frame) -> usize {
        self.deliver(self.pool.user_connections(user_id), frame)
    }

    /// Broadcasts a frame to a room, optionally skipping one connection.
    pub fn broadcast_room(
        &self,
        room_id: &RoomId,
        frame: &Frame,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let targets = self
            .pool
            .room_connections(room_id)
            .into_iter()
            .filter(|handle| Some(handle.id) != exclude)
            .collect();
        self.deliver(targets, frame)
    }

    /// Broadcasts a frame to every connection.
    pub fn broadcast_all(&self, frame: &Frame) -> usize {
        self.deliver(self.pool.all_connections(), frame)
    }

    /// Enqueues a frame to each target. Closed targets are unregistered
    /// after the pass; a full queue only loses this frame.
    fn deliver(&self, targets: Vec<Arc<ConnectionHandle>>, frame: &Frame) -> usize {
        if targets.is_empty() {
            return 0;
        }

        let payload = match encode(frame) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, frame_type = frame.kind.as_str(), "Failed to serialize frame");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for handle in &targets {
            match handle.send(&payload) {
                Ok(()) => delivered += 1,
                Err(SendError::Full) => {
                    warn!(conn_id = %handle.id, "Connection send buffer full, dropping frame");
                    self.metrics.record_dropped();
                }
                Err(SendError::Closed) => closed.push(handle.id),
            }
        }

        self.metrics.record_sent(delivered as u64);

        for conn_id in closed {
            debug!(conn_id = %conn_id, "Connection closed during send");
            self.unregister(&conn_id);
        }

        delivered
    }

    /// Records a heartbeat. Returns `false` for unknown connections.
    pub fn touch_heartbeat(&self, conn_id: &ConnectionId) -> bool {
        match self.pool.get(conn_id) {
            Some(handle) => {
                handle.touch();
                true
            }
            None => false,
        }
    }

    /// Unregisters every connection without a heartbeat within `timeout`.
    pub fn cleanup_stale(&self, timeout: Duration) -> Vec<ConnectionId> {
        let now = Utc::now();
        let stale: Vec<ConnectionId> = self
            .pool
            .all_connections()
            .into_iter()
            .filter(|handle| is_stale(handle.last_heartbeat(), now, timeout))
            .map(|handle| handle.id)
            .collect();

        for conn_id in &stale {
            warn!(conn_id = %conn_id, "Connection heartbeat timeout");
            self.unregister(conn_id);
        }

        stale
    }

    /// Closes all connections.
    pub fn close_all(&self) -> usize {
        let all = self.pool.drain();
        for handle in &all {
            handle.mark_closed();
            self.metrics.record_disconnect();
        }
        info!(count = all.len(), "All connections closed");
        all.len()
    }

    /// Gets a connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Connections currently in a room.
    pub fn room_connections(&self, room_id: &RoomId) -> Vec<Arc<ConnectionHandle>> {
        self.pool.room_connections(room_id)
    }

    /// Distinct users currently in a room.
    pub fn room_users(&self, room_id: &RoomId) -> Vec<UserId> {
        self.pool.room_users(room_id)
    }

    /// Distinct users in a room, or across all connections.
    pub fn user_count(&self, room_id: Option<&RoomId>) -> usize {
        match room_id {
            Some(room) => self.pool.room_users(room).len(),
            None => self.pool.user_count(),
        }
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of occupied rooms.
    pub fn room_count(&self) -> usize {
        self.pool.room_count()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: &UserId) -> bool {
        self.pool.is_user_connected(user_id)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}
