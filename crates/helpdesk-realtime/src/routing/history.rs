//! Bounded per-room chat history for late joiners.

use std::collections::VecDeque;

use dashmap::DashMap;

use helpdesk_core::types::RoomId;

use crate::message::Frame;

/// Ring buffer of recent chat frames per room. Process lifetime only.
#[derive(Debug)]
pub struct RoomHistory {
    rooms: DashMap<RoomId, VecDeque<Frame>>,
    limit: usize,
}

impl RoomHistory {
    /// Create a history keeping `limit` frames per room.
    pub fn new(limit: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            limit: limit.max(1),
        }
    }

    /// Append a frame, dropping the oldest beyond the limit.
    pub fn push(&self, room_id: &RoomId, frame: Frame) {
        let mut frames = self.rooms.entry(room_id.clone()).or_default();
        frames.push_back(frame);
        while frames.len() > self.limit {
            frames.pop_front();
        }
    }

    /// The last `limit` frames of a room, oldest first.
    pub fn recent(&self, room_id: &RoomId, limit: usize) -> Vec<Frame> {
        self.rooms
            .get(room_id)
            .map(|frames| {
                let skip = frames.len().saturating_sub(limit);
                frames.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Number of frames held for a room.
    pub fn len(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map(|f| f.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::message::FrameType;

    #[test]
    fn test_ring_drops_oldest_and_returns_tail() {
        let history = RoomHistory::new(3);
        let room = RoomId::from("r");
        let ids: Vec<String> = (0..5)
            .map(|_| {
                let frame = Frame::new(FrameType::ChatMessage, Map::new());
                let id = frame.message_id.clone();
                history.push(&room, frame);
                id
            })
            .collect();

        assert_eq!(history.len(&room), 3);
        let tail: Vec<String> = history.recent(&room, 2).into_iter().map(|f| f.message_id).collect();
        assert_eq!(tail, ids[3..].to_vec());
        assert!(history.recent(&RoomId::from("empty"), 10).is_empty());
    }
}
