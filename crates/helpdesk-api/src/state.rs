//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use helpdesk_core::config::AppConfig;
use helpdesk_realtime::RealtimeEngine;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Real-time engine.
    pub realtime: RealtimeEngine,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Builds state around an existing engine.
    pub fn new(config: AppConfig, realtime: RealtimeEngine) -> Self {
        Self {
            config: Arc::new(config),
            realtime,
            started_at: Instant::now(),
        }
    }

    /// Builds state with a fresh engine from the configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone());
        Self::new(config, realtime)
    }
}
