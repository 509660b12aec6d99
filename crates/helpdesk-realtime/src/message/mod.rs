//! WebSocket frame types, encoding, and validation.

pub mod builder;
pub mod codec;
pub mod envelope;
pub mod types;
pub mod validator;

pub use envelope::Frame;
pub use types::{FrameType, InboundFrame, TypingAction};
