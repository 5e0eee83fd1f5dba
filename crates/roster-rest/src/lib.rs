//! # Roster REST
//!
//! HTTP surface of Roster: user CRUD, cached reads, explicit cache
//! invalidation and a health check.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
