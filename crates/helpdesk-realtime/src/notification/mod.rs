//! Per-user notification storage, live delivery, and system alerts.

pub mod priority;
pub mod store;

pub use priority::NotificationPriority;
pub use store::{NewNotification, Notification, NotificationStore};
