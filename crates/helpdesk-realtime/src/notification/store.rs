//! Notification store: bounded per-user inbox with live WebSocket delivery.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use helpdesk_core::config::NotificationsConfig;
use helpdesk_core::types::{NotificationId, RoomId, UserId};

use crate::connection::ConnectionRegistry;
use crate::message::builder::{build_notification, build_system_alert};
use crate::metrics::EngineMetrics;

use super::priority::NotificationPriority;

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID
    pub id: NotificationId,
    /// Recipient
    pub user_id: UserId,
    /// Title
    pub title: String,
    /// Body text
    pub message: String,
    /// Priority
    pub priority: NotificationPriority,
    /// Extra data
    pub data: Map<String, Value>,
    /// Created at
    pub created_at: DateTime<Utc>,
    /// Expiry, if any
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the recipient has read it
    pub read: bool,
}

impl Notification {
    /// Whether the notification has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Input for [`NotificationStore::enqueue`].
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    /// Title
    pub title: String,
    /// Body text
    pub message: String,
    /// Priority
    pub priority: NotificationPriority,
    /// Extra data
    pub data: Map<String, Value>,
    /// Time to live, or `None` to keep until pushed out
    pub ttl: Option<Duration>,
}

impl NewNotification {
    /// Notification with a title, body, and priority.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        priority: NotificationPriority,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            priority,
            ..Self::default()
        }
    }
}

/// In-memory notification store.
///
/// Keeps the most recent `max_stored_per_user` notifications per user.
/// Expired entries are hidden on read and removed by
/// [`purge_expired`](Self::purge_expired).
#[derive(Debug)]
pub struct NotificationStore {
    /// User ID → notifications, oldest first
    inbox: DashMap<UserId, VecDeque<Notification>>,
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<EngineMetrics>,
    config: NotificationsConfig,
}

impl NotificationStore {
    /// Create a new store
    pub fn new(
        config: NotificationsConfig,
        registry: Arc<ConnectionRegistry>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            inbox: DashMap::new(),
            registry,
            metrics,
            config,
        }
    }

    /// Store a notification and push it to the user's open connections.
    ///
    /// Delivery is not retried; an offline user sees it on the next `list`.
    pub fn enqueue(&self, user_id: &UserId, new: NewNotification) -> NotificationId {
        let created_at = Utc::now();
        let expires_at = new
            .ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .map(|ttl| created_at + ttl);

        let notification = Notification {
            id: NotificationId::new(),
            user_id: user_id.clone(),
            title: new.title,
            message: new.message,
            priority: new.priority,
            data: new.data,
            created_at,
            expires_at,
            read: false,
        };

        let frame = build_notification(
            &notification.id.to_string(),
            &notification.title,
            &notification.message,
            notification.priority,
            &notification.data,
            notification.created_at,
            notification.expires_at,
        );
        let id = notification.id;

        {
            let mut inbox = self.inbox.entry(user_id.clone()).or_default();
            inbox.push_back(notification);
            let max = self.config.max_stored_per_user.max(1);
            while inbox.len() > max {
                inbox.pop_front();
            }
        }
        self.metrics.record_notification();

        let delivered = self.registry.send_to_user(user_id, &frame);
        info!(
            notification_id = %id,
            user_id = %user_id,
            delivered,
            "Notification enqueued"
        );

        id
    }

    /// List a user's unexpired notifications, newest first.
    pub fn list(&self, user_id: &UserId, unread_only: bool, limit: Option<usize>) -> Vec<Notification> {
        let limit = limit.unwrap_or(self.config.default_list_limit);
        let now = Utc::now();

        let Some(inbox) = self.inbox.get(user_id) else {
            return Vec::new();
        };

        inbox
            .iter()
            .rev()
            .filter(|n| !n.is_expired(now))
            .filter(|n| !unread_only || !n.read)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Mark one notification read. Returns `false` if not found.
    pub fn mark_read(&self, user_id: &UserId, id: &NotificationId) -> bool {
        let Some(mut inbox) = self.inbox.get_mut(user_id) else {
            return false;
        };
        match inbox.iter_mut().find(|n| n.id == *id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark all of a user's notifications read. Returns how many changed.
    pub fn mark_all_read(&self, user_id: &UserId) -> usize {
        let Some(mut inbox) = self.inbox.get_mut(user_id) else {
            return 0;
        };
        let mut changed = 0;
        for notification in inbox.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    /// Count of unread, unexpired notifications.
    pub fn unread_count(&self, user_id: &UserId) -> usize {
        let now = Utc::now();
        self.inbox
            .get(user_id)
            .map(|inbox| {
                inbox
                    .iter()
                    .filter(|n| !n.read && !n.is_expired(now))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Remove expired notifications for every user.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut purged = 0;
        for mut inbox in self.inbox.iter_mut() {
            let before = inbox.len();
            inbox.retain(|n| !n.is_expired(now));
            purged += before - inbox.len();
        }
        self.inbox.retain(|_, inbox| !inbox.is_empty());

        if purged > 0 {
            debug!(count = purged, "Purged expired notifications");
        }
        purged
    }

    /// Send a `system_alert` to a room, or to everyone. Returns frames delivered.
    pub fn broadcast_system_alert(
        &self,
        title: &str,
        message: &str,
        priority: NotificationPriority,
        room_id: Option<&RoomId>,
    ) -> usize {
        let alert_id = Uuid::new_v4().to_string();
        let frame = build_system_alert(&alert_id, title, message, priority, room_id);

        let delivered = match room_id {
            Some(room) => self.registry.broadcast_room(room, &frame, None),
            None => self.registry.broadcast_all(&frame),
        };
        self.metrics.record_alert();

        warn!(
            alert_id = %alert_id,
            title = %title,
            priority = priority.as_str(),
            room_id = ?room_id.map(RoomId::as_str),
            delivered,
            "Broadcast system alert"
        );
        delivered
    }

    #[cfg(test)]
    fn expire(&self, user_id: &UserId, id: &NotificationId) {
        if let Some(mut inbox) = self.inbox.get_mut(user_id)
            && let Some(n) = inbox.iter_mut().find(|n| n.id == *id)
        {
            n.expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        }
    }
}
