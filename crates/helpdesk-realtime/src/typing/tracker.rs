//! Typing indicator tracker.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use helpdesk_core::types::{RoomId, UserId};

use crate::connection::ConnectionRegistry;
use crate::message::TypingAction;
use crate::message::builder::build_typing;

/// Tracks who is typing in each room.
///
/// Entries older than the staleness window are evicted both lazily, by
/// [`current_typists`](Self::current_typists), and actively, by
/// [`cleanup_stale`](Self::cleanup_stale).
#[derive(Debug)]
pub struct TypingTracker {
    /// Room ID → (user ID → started typing at)
    rooms: DashMap<RoomId, HashMap<UserId, Instant>>,
    registry: Arc<ConnectionRegistry>,
    stale_after: Duration,
}

impl TypingTracker {
    /// Create a new typing tracker
    pub fn new(registry: Arc<ConnectionRegistry>, stale_after: Duration) -> Self {
        Self {
            rooms: DashMap::new(),
            registry,
            stale_after,
        }
    }

    /// Mark a user as typing and tell the room. Returns frames delivered.
    pub fn start_typing(&self, user_id: &UserId, room_id: &RoomId) -> usize {
        self.rooms
            .entry(room_id.clone())
            .or_default()
            .insert(user_id.clone(), Instant::now());

        self.announce(user_id, room_id, TypingAction::StartTyping)
    }

    /// Clear a user's typing state and tell the room. Returns frames delivered.
    ///
    /// The room is told even when the user was not marked as typing.
    pub fn stop_typing(&self, user_id: &UserId, room_id: &RoomId) -> usize {
        self.forget(user_id, room_id);
        self.announce(user_id, room_id, TypingAction::StopTyping)
    }

    /// Users currently typing in a room, after dropping stale entries.
    pub fn current_typists(&self, room_id: &RoomId) -> Vec<UserId> {
        let now = Instant::now();
        let mut typists = {
            let Some(mut users) = self.rooms.get_mut(room_id) else {
                return Vec::new();
            };
            users.retain(|_, started| now.duration_since(*started) <= self.stale_after);
            users.keys().cloned().collect::<Vec<_>>()
        };
        self.rooms.remove_if(room_id, |_, users| users.is_empty());

        typists.sort();
        typists
    }

    /// Evict stale entries in every room, telling each room the user stopped.
    ///
    /// Returns the number of evicted entries.
    pub fn cleanup_stale(&self) -> usize {
        let now = Instant::now();
        let mut stale: Vec<(RoomId, UserId)> = Vec::new();

        for mut room in self.rooms.iter_mut() {
            let room_id = room.key().clone();
            room.value_mut().retain(|user_id, started| {
                let fresh = now.duration_since(*started) <= self.stale_after;
                if !fresh {
                    stale.push((room_id.clone(), user_id.clone()));
                }
                fresh
            });
        }
        self.rooms.retain(|_, users| !users.is_empty());

        for (room_id, user_id) in &stale {
            self.announce(user_id, room_id, TypingAction::StopTyping);
        }

        if !stale.is_empty() {
            debug!(count = stale.len(), "Evicted stale typing indicators");
        }
        stale.len()
    }

    fn forget(&self, user_id: &UserId, room_id: &RoomId) {
        if let Some(mut users) = self.rooms.get_mut(room_id) {
            users.remove(user_id);
        }
        self.rooms.remove_if(room_id, |_, users| users.is_empty());
    }

    fn announce(&self, user_id: &UserId, room_id: &RoomId, action: TypingAction) -> usize {
        let frame = build_typing(user_id, room_id, action);
        self.registry.broadcast_room(room_id, &frame, None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tokio::sync::mpsc;

    use super::*;
    use crate::metrics::EngineMetrics;
    use crate::presence::PresenceTracker;

    fn setup() -> (Arc<ConnectionRegistry>, TypingTracker) {
        let registry = Arc::new(ConnectionRegistry::new(
            32,
            Arc::new(PresenceTracker::new(50)),
            Arc::new(EngineMetrics::new()),
        ));
        let typing = TypingTracker::new(registry.clone(), Duration::from_secs(10));
        (registry, typing)
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(raw) = rx.try_recv() {
            frames.push(serde_json::from_str(&raw).expect("json"));
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_eviction_on_read() {
        let (_registry, typing) = setup();
        let room = RoomId::from("support-1");
        let alice = UserId::from("alice");

        typing.start_typing(&alice, &room);
        assert_eq!(typing.current_typists(&room), vec![alice.clone()]);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(typing.current_typists(&room).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_cleanup_broadcasts_stop() {
        let (registry, typing) = setup();
        let room = RoomId::from("support-1");
        let (_conn, mut rx) = registry.register(UserId::from("bob"), Some(room.clone()));

        typing.start_typing(&UserId::from("alice"), &room);
        tokio::time::advance(Duration::from_secs(5)).await;
        typing.start_typing(&UserId::from("carol"), &room);
        drain(&mut rx);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(typing.cleanup_stale(), 1);

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["action"], "stop_typing");
        assert_eq!(frames[0]["data"]["user_id"], "alice");
        assert_eq!(typing.current_typists(&room), vec![UserId::from("carol")]);
    }

    #[tokio::test]
    async fn test_start_and_stop_reach_room() {
        let (registry, typing) = setup();
        let room = RoomId::from("support-1");
        let (_conn, mut rx) = registry.register(UserId::from("bob"), Some(room.clone()));
        let alice = UserId::from("alice");

        assert_eq!(typing.start_typing(&alice, &room), 1);
        assert_eq!(typing.stop_typing(&alice, &room), 1);
        assert!(typing.current_typists(&room).is_empty());

        let actions: Vec<Value> = drain(&mut rx)
            .into_iter()
            .map(|f| f["data"]["action"].clone())
            .collect();
        assert_eq!(actions, vec![Value::from("start_typing"), Value::from("stop_typing")]);
    }
}
