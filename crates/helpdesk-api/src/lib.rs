//! # helpdesk-api
//!
//! HTTP API layer for the helpdesk realtime service built on Axum.
//!
//! Provides the REST endpoints over presence, rooms, notifications and
//! alerts, the WebSocket upgrade, request logging and CORS middleware,
//! extractors, DTOs, and server startup.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
