//! Notification priority levels.

use serde::{Deserialize, Serialize};

/// Notification priority levels
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Low priority, background information
    Low,
    /// Normal priority
    #[default]
    Normal,
    /// High priority, needs an acknowledgment
    High,
    /// Critical priority, system-level alerts
    Critical,
}

impl NotificationPriority {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Whether live delivery asks the client to acknowledge
    pub fn requires_ack(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}
