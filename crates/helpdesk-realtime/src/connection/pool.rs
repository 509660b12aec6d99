//! Connection pool, indexing active connections by id, user, and room.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use helpdesk_core::types::{ConnectionId, RoomId, UserId};

use super::handle::ConnectionHandle;

#[derive(Debug, Default)]
struct PoolIndex {
    by_id: HashMap<ConnectionId, Arc<ConnectionHandle>>,
    by_user: HashMap<UserId, HashSet<ConnectionId>>,
    by_room: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// Thread-safe pool of all active WebSocket connections.
///
/// All three indexes sit behind one lock so they always agree. Every method
/// returns owned snapshots; the lock is never held by callers.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    index: RwLock<PoolIndex>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, PoolIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PoolIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        let mut index = self.write();
        index
            .by_user
            .entry(handle.user_id.clone())
            .or_default()
            .insert(handle.id);
        if let Some(room) = &handle.room_id {
            index.by_room.entry(room.clone()).or_default().insert(handle.id);
        }
        index.by_id.insert(handle.id, handle);
    }

    /// Removes a connection from every index.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let mut index = self.write();
        let handle = index.by_id.remove(conn_id)?;

        if let Some(conns) = index.by_user.get_mut(&handle.user_id) {
            conns.remove(conn_id);
            if conns.is_empty() {
                index.by_user.remove(&handle.user_id);
            }
        }

        if let Some(room) = &handle.room_id
            && let Some(conns) = index.by_room.get_mut(room)
        {
            conns.remove(conn_id);
            if conns.is_empty() {
                index.by_room.remove(room);
            }
        }

        Some(handle)
    }

    /// Removes every connection.
    pub fn drain(&self) -> Vec<Arc<ConnectionHandle>> {
        let mut index = self.write();
        index.by_user.clear();
        index.by_room.clear();
        index.by_id.drain().map(|(_, handle)| handle).collect()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.read().by_id.get(conn_id).cloned()
    }

    /// Gets all connections for a user.
    pub fn user_connections(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        let index = self.read();
        index
            .by_user
            .get(user_id)
            .map(|ids| Self::resolve(&index, ids))
            .unwrap_or_default()
    }

    /// Gets all connections in a room.
    pub fn room_connections(&self, room_id: &RoomId) -> Vec<Arc<ConnectionHandle>> {
        let index = self.read();
        index
            .by_room
            .get(room_id)
            .map(|ids| Self::resolve(&index, ids))
            .unwrap_or_default()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.read().by_id.values().cloned().collect()
    }

    /// Distinct users with a connection in the room, sorted.
    pub fn room_users(&self, room_id: &RoomId) -> Vec<UserId> {
        let index = self.read();
        let Some(ids) = index.by_room.get(room_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| index.by_id.get(id))
            .map(|handle| handle.user_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Connection ids currently indexed under a room.
    pub fn room_member_ids(&self, room_id: &RoomId) -> HashSet<ConnectionId> {
        self.read()
            .by_room
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.read().by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.read().by_user.len()
    }

    /// Returns number of rooms with at least one connection.
    pub fn room_count(&self) -> usize {
        self.read().by_room.len()
    }

    /// Whether the user has at least one connection.
    pub fn is_user_connected(&self, user_id: &UserId) -> bool {
        self.read().by_user.contains_key(user_id)
    }

    fn resolve(index: &PoolIndex, ids: &HashSet<ConnectionId>) -> Vec<Arc<ConnectionHandle>> {
        ids.iter().filter_map(|id| index.by_id.get(id).cloned()).collect()
    }
}
