//! Presence tracker, holding each user's status, room, and status history.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use helpdesk_core::types::{ConnectionId, RoomId, UserId};

use super::status::UserStatus;

/// A user's current availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPresence {
    /// User ID
    pub user_id: UserId,
    /// Current status
    pub status: UserStatus,
    /// Last time any update touched this user
    pub last_seen: DateTime<Utc>,
    /// Most recently reported room
    pub current_room: Option<RoomId>,
    /// Most recently reported connection
    pub connection_id: Option<ConnectionId>,
    /// Free-form client metadata, merged on each update
    pub metadata: Map<String, Value>,
}

/// One recorded status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Previous status
    pub from_status: UserStatus,
    /// New status
    pub to_status: UserStatus,
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
    /// Room given with the update, if any
    pub room_id: Option<RoomId>,
}

/// Tracks presence state for all users.
///
/// Entries are never removed; inactive users are forced `offline` by
/// [`PresenceTracker::cleanup_offline`].
#[derive(Debug)]
pub struct PresenceTracker {
    /// User ID → current presence
    presence: DashMap<UserId, UserPresence>,
    /// User ID → bounded transition history, oldest first
    history: DashMap<UserId, VecDeque<StatusChange>>,
    /// Max history records per user
    history_limit: usize,
}

impl PresenceTracker {
    /// Create a new presence tracker
    pub fn new(history_limit: usize) -> Self {
        Self {
            presence: DashMap::new(),
            history: DashMap::new(),
            history_limit: history_limit.max(1),
        }
    }

    /// Create or update a user's presence.
    ///
    /// `room` and `connection` overwrite the stored values when given, so the
    /// most recent update wins. `metadata` is merged key by key. Returns the
    /// recorded transition when the status actually changed.
    pub fn update(
        &self,
        user_id: &UserId,
        status: UserStatus,
        room: Option<&RoomId>,
        connection: Option<ConnectionId>,
        metadata: Option<Map<String, Value>>,
    ) -> Option<StatusChange> {
        let now = Utc::now();

        let previous = {
            let mut entry = self
                .presence
                .entry(user_id.clone())
                .or_insert_with(|| UserPresence {
                    user_id: user_id.clone(),
                    status: UserStatus::Offline,
                    last_seen: now,
                    current_room: None,
                    connection_id: None,
                    metadata: Map::new(),
                });

            let previous = entry.status;
            entry.status = status;
            entry.last_seen = now;
            if let Some(room) = room {
                entry.current_room = Some(room.clone());
            }
            if let Some(connection) = connection {
                entry.connection_id = Some(connection);
            }
            if let Some(metadata) = metadata {
                entry.metadata.extend(metadata);
            }
            previous
        };

        if previous == status {
            return None;
        }

        let change = StatusChange {
            from_status: previous,
            to_status: status,
            timestamp: now,
            room_id: room.cloned(),
        };
        self.record(user_id, change.clone());

        debug!(
            user_id = %user_id,
            from = previous.as_str(),
            to = status.as_str(),
            "Presence changed"
        );

        Some(change)
    }

    /// Get a user's current presence
    pub fn get(&self, user_id: &UserId) -> Option<UserPresence> {
        self.presence.get(user_id).map(|r| r.value().clone())
    }

    /// Get a user's status history, oldest first
    pub fn history(&self, user_id: &UserId) -> Vec<StatusChange> {
        self.history
            .get(user_id)
            .map(|r| r.value().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Non-offline users whose current room is `room_id`
    pub fn room_presence(&self, room_id: &RoomId) -> Vec<UserPresence> {
        self.collect_online(|p| p.current_room.as_ref() == Some(room_id))
    }

    /// All non-offline users
    pub fn online_users(&self) -> Vec<UserPresence> {
        self.collect_online(|_| true)
    }

    /// Number of non-offline users
    pub fn online_count(&self) -> usize {
        self.presence
            .iter()
            .filter(|r| r.value().status.is_online())
            .count()
    }

    /// Force every non-offline user not seen within `timeout` to `offline`.
    ///
    /// Returns the affected users.
    pub fn cleanup_offline(&self, timeout: Duration) -> Vec<UserId> {
        let Ok(window) = chrono::Duration::from_std(timeout) else {
            return Vec::new();
        };
        let cutoff = Utc::now() - window;
        let now = Utc::now();

        let mut changes = Vec::new();
        for mut entry in self.presence.iter_mut() {
            if entry.status.is_online() && entry.last_seen < cutoff {
                changes.push((
                    entry.user_id.clone(),
                    StatusChange {
                        from_status: entry.status,
                        to_status: UserStatus::Offline,
                        timestamp: now,
                        room_id: None,
                    },
                ));
                entry.status = UserStatus::Offline;
            }
        }

        let mut users = Vec::with_capacity(changes.len());
        for (user_id, change) in changes {
            self.record(&user_id, change);
            users.push(user_id);
        }
        users.sort();

        if !users.is_empty() {
            debug!(count = users.len(), "Forced inactive users offline");
        }
        users
    }

    fn record(&self, user_id: &UserId, change: StatusChange) {
        let mut history = self.history.entry(user_id.clone()).or_default();
        history.push_back(change);
        while history.len() > self.history_limit {
            history.pop_front();
        }
    }

    fn collect_online(&self, filter: impl Fn(&UserPresence) -> bool) -> Vec<UserPresence> {
        let mut users: Vec<UserPresence> = self
            .presence
            .iter()
            .filter(|r| r.value().status.is_online() && filter(r.value()))
            .map(|r| r.value().clone())
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        users
    }

    #[cfg(test)]
    fn backdate(&self, user_id: &UserId, by: Duration) {
        if let Some(mut entry) = self.presence.get_mut(user_id) {
            entry.last_seen -= chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        }
    }
}
