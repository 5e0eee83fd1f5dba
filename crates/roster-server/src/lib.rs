//! # Roster Server
//!
//! Wiring and startup helpers for the Roster HTTP server.

pub mod di;
pub mod startup;
