//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// Longest username the `users` table accepts, in characters.
pub const USERNAME_MAX_LEN: usize = 80;

/// Longest email the `users` table accepts, in characters.
pub const EMAIL_MAX_LEN: usize = 120;

/// A registered user. Records are owned by the persistence layer, which
/// assigns `id` and enforces uniqueness of `username` and `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-generated identifier.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,
}

impl User {
    /// Creates a user from already-persisted parts.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Merges the supplied fields into this user, keeping the previous value
    /// of every field that was not supplied.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

/// Data needed to insert a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Materializes the record once the store has assigned an id.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.username, self.email)
    }
}

/// A partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none()
    }
}
