//! # Roster Service
//!
//! Business logic for Roster: the user service and the read-through cache
//! that fronts cacheable reads.

pub mod cache;
pub mod dto;
pub mod service_impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use service_impl::UserServiceImpl;
pub use user_service::*;
