//! User service implementations.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use roster_core::{NewUser, RosterError, RosterResult, UserChanges, UserId};
use roster_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// User service backed by a [`UserRepository`].
///
/// Uniqueness is enforced by the repository; this layer only translates
/// missing rows into `NotFound`.
pub struct UserServiceImpl {
    user_repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserId> {
        debug!("Creating user: {}", request.username);

        let saved = self.user_repository.save(&NewUser::from(request)).await?;

        info!("User created: {}", saved.id);
        Ok(saved.id)
    }

    async fn list_users(&self) -> RosterResult<Vec<UserResponse>> {
        debug!("Listing users");

        let users = self.user_repository.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse> {
        debug!("Updating user: {}", id);

        let changes = UserChanges::from(request);
        let user = self
            .user_repository
            .update(id, &changes)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(user))
    }

    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        if !self.user_repository.delete(id).await? {
            return Err(RosterError::not_found("User", id));
        }

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}
