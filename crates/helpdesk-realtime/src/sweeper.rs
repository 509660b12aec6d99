//! Background sweeper for time-based cleanup.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::server::RealtimeEngine;

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Connections dropped for missing heartbeats
    pub stale_connections: usize,
    /// Typing indicators evicted
    pub stale_typists: usize,
    /// Users forced offline
    pub offline_users: usize,
    /// Expired notifications removed
    pub expired_notifications: usize,
}

/// Periodically evicts stale connections, typing indicators, presence,
/// and expired notifications until shut down.
#[derive(Debug, Clone)]
pub struct RealtimeSweeper {
    engine: RealtimeEngine,
    interval: Duration,
}

impl RealtimeSweeper {
    /// Sweeper running at the engine's configured interval.
    pub fn new(engine: RealtimeEngine) -> Self {
        let interval = engine.config.sweep_interval();
        Self { engine, interval }
    }

    /// Runs one pass.
    pub fn sweep_once(&self) -> SweepReport {
        let config = &self.engine.config;
        let report = SweepReport {
            stale_connections: self
                .engine
                .connections
                .cleanup_stale(config.heartbeat_timeout())
                .len(),
            stale_typists: self.engine.typing.cleanup_stale(),
            offline_users: self
                .engine
                .presence
                .cleanup_offline(config.presence_offline_timeout())
                .len(),
            expired_notifications: self.engine.notifications.purge_expired(),
        };

        debug!(
            stale_connections = report.stale_connections,
            stale_typists = report.stale_typists,
            offline_users = report.offline_users,
            expired_notifications = report.expired_notifications,
            "Sweep completed"
        );
        report
    }

    /// Spawns the sweep loop. It exits when `shutdown` flips to `true` or its
    /// sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            info!(interval_secs = self.interval.as_secs(), "Realtime sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.sweep_once();
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Realtime sweeper stopped");
        })
    }
}
