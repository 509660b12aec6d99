//! Inbound frame dispatch, room history, and chat acknowledgments.

pub mod acks;
pub mod history;
pub mod router;

pub use acks::{AckLedger, InFlightMessage};
pub use history::RoomHistory;
pub use router::MessageRouter;
