//! # helpdesk-realtime
//!
//! Real-time presence and messaging layer for the helpdesk chat backend.
//! Provides:
//!
//! - WebSocket connection registry with per-room fan-out
//! - User presence tracking (online/away/busy/offline) with status history
//! - Per-room typing indicators with lazy and active expiry
//! - Per-user notification inbox with live delivery and system alerts
//! - Inbound frame routing, room history, and chat acknowledgments

pub mod connection;
pub mod error;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod presence;
pub mod routing;
pub mod server;
pub mod sweeper;
pub mod typing;

pub use connection::ConnectionRegistry;
pub use notification::NotificationStore;
pub use presence::PresenceTracker;
pub use routing::MessageRouter;
pub use server::RealtimeEngine;
pub use sweeper::RealtimeSweeper;
pub use typing::TypingTracker;
