//! Route handlers organized by domain.

pub mod alert;
pub mod health;
pub mod notification;
pub mod presence;
pub mod realtime;
pub mod rooms;
pub mod ws;
