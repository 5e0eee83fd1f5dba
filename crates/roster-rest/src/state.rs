//! Application state for Axum handlers.

use roster_service::{CacheMediator, UserService};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub cache: CacheMediator,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(user_service: Arc<dyn UserService>, cache: CacheMediator) -> Self {
        Self { user_service, cache }
    }
}
