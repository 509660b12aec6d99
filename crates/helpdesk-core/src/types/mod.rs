//! Core type definitions used across the helpdesk workspace.

pub mod id;
pub mod response;

pub use id::*;
