//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use roster_core::{Interface, RosterResult, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a new user and returns its generated ID.
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserId>;

    /// Lists all users ordered by ID.
    async fn list_users(&self) -> RosterResult<Vec<UserResponse>>;

    /// Merges the supplied fields into an existing user.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;
}
