//! Ledger of chat messages awaiting acknowledgment.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use helpdesk_core::types::{ConnectionId, RoomId, UserId};

/// A relayed chat message and the connections that acknowledged it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InFlightMessage {
    /// Frame id
    pub message_id: String,
    /// Sender
    pub sender_id: UserId,
    /// Room
    pub room_id: RoomId,
    /// Chat payload
    pub payload: Map<String, Value>,
    /// Whether receivers were asked to acknowledge
    pub requires_ack: bool,
    /// Connections that acknowledged
    pub acknowledged_by: HashSet<ConnectionId>,
    /// When the message was relayed
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct LedgerIndex {
    order: VecDeque<String>,
    entries: HashMap<String, InFlightMessage>,
}

/// Bounded, insertion-ordered ack ledger. No retry is attempted.
#[derive(Debug)]
pub struct AckLedger {
    index: Mutex<LedgerIndex>,
    capacity: usize,
}

impl AckLedger {
    /// Create a ledger holding at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: Mutex::new(LedgerIndex::default()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerIndex> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking a message, evicting the oldest beyond capacity.
    pub fn track(&self, message: InFlightMessage) {
        let mut index = self.lock();
        if index.entries.contains_key(&message.message_id) {
            return;
        }
        index.order.push_back(message.message_id.clone());
        index.entries.insert(message.message_id.clone(), message);

        while index.order.len() > self.capacity {
            if let Some(oldest) = index.order.pop_front() {
                index.entries.remove(&oldest);
            }
        }
    }

    /// Record an acknowledgment. Returns `false` for unknown message ids.
    pub fn acknowledge(&self, message_id: &str, conn_id: ConnectionId) -> bool {
        match self.lock().entries.get_mut(message_id) {
            Some(entry) => {
                entry.acknowledged_by.insert(conn_id);
                true
            }
            None => false,
        }
    }

    /// Look up a tracked message.
    pub fn get(&self, message_id: &str) -> Option<InFlightMessage> {
        self.lock().entries.get(message_id).cloned()
    }

    /// Number of tracked messages.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
