//! Custom Axum extractors.

mod id;
mod json;

pub use id::*;
pub use json::*;
