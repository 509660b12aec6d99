//! Custom Axum extractors and path helpers.

pub mod path;
pub mod validated;

pub use validated::ValidatedJson;
