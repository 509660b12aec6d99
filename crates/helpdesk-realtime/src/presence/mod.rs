//! User presence tracking.

pub mod status;
pub mod tracker;

pub use status::UserStatus;
pub use tracker::{PresenceTracker, StatusChange, UserPresence};
