//! Heartbeat staleness checks.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Whether a connection whose last heartbeat was at `last` has timed out by `now`.
pub fn is_stale(last: DateTime<Utc>, now: DateTime<Utc>, timeout: Duration) -> bool {
    match (now - last).to_std() {
        Ok(elapsed) => elapsed > timeout,
        // `last` is in the future (clock skew); treat as fresh.
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staleness_boundary() {
        let now = Utc::now();
        let timeout = Duration::from_secs(300);
        assert!(!is_stale(now - chrono::Duration::seconds(300), now, timeout));
        assert!(is_stale(now - chrono::Duration::seconds(301), now, timeout));
        assert!(!is_stale(now + chrono::Duration::seconds(5), now, timeout));
    }
}
