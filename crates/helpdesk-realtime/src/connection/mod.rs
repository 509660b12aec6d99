//! WebSocket connection management: handles, the indexed pool, heartbeat
//! staleness, and the registry that fans frames out.

pub mod handle;
pub mod heartbeat;
pub mod pool;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionInfo};
pub use registry::ConnectionRegistry;
