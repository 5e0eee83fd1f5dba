//! Repository trait definitions.

use roster_core::{Interface, NewUser, RosterResult, User, UserChanges, UserId};
use async_trait::async_trait;

/// User repository trait.
///
/// Implementations enforce uniqueness of `username` and `email` and report
/// violations as [`roster_core::RosterError::Conflict`].
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Returns every user ordered by ID.
    async fn find_all(&self) -> RosterResult<Vec<User>>;

    /// Inserts a new user and returns it with its generated ID.
    async fn save(&self, user: &NewUser) -> RosterResult<User>;

    /// Merges `changes` into the user with the given ID.
    ///
    /// Returns `None` if no such user exists.
    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>>;

    /// Deletes a user by ID. Returns `true` if a row was removed.
    async fn delete(&self, id: UserId) -> RosterResult<bool>;
}
