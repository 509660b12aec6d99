//! # helpdesk-core
//!
//! Core crate for the helpdesk realtime service. Contains configuration
//! schemas and loading, typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other helpdesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
