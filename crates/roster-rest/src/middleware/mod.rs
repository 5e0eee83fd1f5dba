//! HTTP middleware.

mod cache;
mod logging;

pub use cache::*;
pub use logging::*;
