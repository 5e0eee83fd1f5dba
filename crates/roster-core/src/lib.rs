//! # Roster Core
//!
//! Core types, domain entities, and error definitions for Roster.
//! Every other crate in the workspace builds on the abstractions defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
