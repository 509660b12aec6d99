//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, mpsc};

use helpdesk_core::types::{ConnectionId, RoomId, UserId};

use crate::error::SendError;

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing encoded frames to the client, plus metadata
/// about the connected user and room.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// Room joined at connect time, if any
    pub room_id: Option<RoomId>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound frames
    sender: mpsc::Sender<String>,
    /// Last heartbeat, as Unix milliseconds
    last_heartbeat_ms: AtomicI64,
    /// Whether the connection is still registered
    alive: AtomicBool,
    /// Fired once when the server closes the connection
    close: Notify,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(user_id: UserId, room_id: Option<RoomId>, sender: mpsc::Sender<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConnectionId::new(),
            user_id,
            room_id,
            connected_at: now,
            sender,
            last_heartbeat_ms: AtomicI64::new(now.timestamp_millis()),
            alive: AtomicBool::new(true),
            close: Notify::new(),
        }
    }

    /// Enqueue an encoded frame without waiting.
    pub fn send(&self, payload: &str) -> Result<(), SendError> {
        if !self.is_alive() {
            return Err(SendError::Closed);
        }
        match self.sender.try_send(payload.to_owned()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendError::Full),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection closed and wake its socket task.
    pub fn mark_closed(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.close.notify_waiters();
        }
    }

    /// Resolves once [`mark_closed`](Self::mark_closed) has been called.
    pub async fn closed(&self) {
        let notified = self.close.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent close is not missed.
        notified.as_mut().enable();
        if !self.is_alive() {
            return;
        }
        notified.await;
    }

    /// Record a heartbeat
    pub fn touch(&self) {
        self.last_heartbeat_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Time of the last heartbeat
    pub fn last_heartbeat(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_heartbeat_ms.load(Ordering::Relaxed))
            .unwrap_or(self.connected_at)
    }

    /// Get a snapshot of connection info
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            user_id: self.user_id.clone(),
            room_id: self.room_id.clone(),
            connected_at: self.connected_at,
            last_heartbeat: self.last_heartbeat(),
            alive: self.is_alive(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_last_heartbeat(&self, at: DateTime<Utc>) {
        self.last_heartbeat_ms
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// User ID
    pub user_id: UserId,
    /// Room ID
    pub room_id: Option<RoomId>,
    /// Connected at
    pub connected_at: DateTime<Utc>,
    /// Last heartbeat
    pub last_heartbeat: DateTime<Utc>,
    /// Is alive
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reports_full_and_closed() {
        let (tx, rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(UserId::from("alice"), None, tx);

        assert_eq!(handle.send("one"), Ok(()));
        assert_eq!(handle.send("two"), Err(SendError::Full));

        drop(rx);
        assert_eq!(handle.send("three"), Err(SendError::Closed));
    }

    #[tokio::test]
    async fn test_mark_closed_wakes_waiter() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(UserId::from("alice"), None, tx);
        handle.mark_closed();
        handle.closed().await;
        assert!(!handle.is_alive());
        assert_eq!(handle.send("late"), Err(SendError::Closed));
    }

    #[tokio::test]
    async fn test_mark_closed_wakes_every_waiter() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = std::sync::Arc::new(ConnectionHandle::new(UserId::from("alice"), None, tx));

        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let h = handle.clone();
                tokio::spawn(async move { h.closed().await })
            })
            .collect();
        tokio::task::yield_now().await;

        handle.mark_closed();
        for waiter in waiters {
            waiter.await.expect("waiter finished");
        }
    }
}
