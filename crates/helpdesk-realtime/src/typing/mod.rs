//! Per-room typing indicators.

pub mod tracker;

pub use tracker::TypingTracker;
