//! Process-local user repository.
//!
//! Used by the `memory` storage backend and by tests that exercise the
//! service and HTTP layers without a database.

use crate::traits::UserRepository;
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::{
    NewUser, RosterError, RosterResult, User, UserChanges, UserId, EMAIL_MAX_LEN, USERNAME_MAX_LEN,
};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug)]
struct Inner {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

/// In-memory user repository with the same uniqueness and column-length
/// rules as the PostgreSQL schema.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    inner: Mutex<Inner>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates an empty repository. The first assigned ID is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

/// Rejects values longer than their `VARCHAR` column, failing the same way
/// PostgreSQL does (a database error, not a conflict).
fn check_lengths(username: Option<&str>, email: Option<&str>) -> RosterResult<()> {
    for (value, max) in [(username, USERNAME_MAX_LEN), (email, EMAIL_MAX_LEN)] {
        if value.is_some_and(|v| v.chars().count() > max) {
            return Err(RosterError::Database(format!(
                "value too long for type character varying({})",
                max
            )));
        }
    }
    Ok(())
}

impl Inner {
    /// Rejects `username`/`email` already held by a user other than `except`.
    fn check_unique(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<UserId>,
    ) -> RosterResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if username == Some(user.username.as_str()) {
                return Err(RosterError::conflict(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            if email == Some(user.email.as_str()) {
                return Err(RosterError::conflict(format!(
                    "email '{}' already exists",
                    user.email
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        Ok(self.inner.lock().users.values().cloned().collect())
    }

    async fn save(&self, user: &NewUser) -> RosterResult<User> {
        check_lengths(Some(&user.username), Some(&user.email))?;

        let mut inner = self.inner.lock();
        inner.check_unique(Some(&user.username), Some(&user.email), None)?;

        let id = UserId::new(inner.next_id);
        inner.next_id += 1;

        let created = user.clone().into_user(id);
        inner.users.insert(id, created.clone());
        debug!("Inserted user {} ({})", id, created.username);
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>> {
        let mut inner = self.inner.lock();
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        check_lengths(changes.username.as_deref(), changes.email.as_deref())?;
        inner.check_unique(changes.username.as_deref(), changes.email.as_deref(), Some(id))?;

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.apply(changes.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        Ok(self.inner.lock().users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let a = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();
        let b = repo.save(&NewUser::new("b", "b@x.com")).await.unwrap();

        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        let err = repo.save(&NewUser::new("a", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, RosterError::Conflict(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        let err = repo.save(&NewUser::new("b", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, RosterError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryUserRepository::new();
        for name in ["c", "a", "b"] {
            repo.save(&NewUser::new(name, format!("{name}@x.com")))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id.into_inner())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let repo = InMemoryUserRepository::new();
        let user = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        let changes = UserChanges {
            username: None,
            email: Some("new@x.com".to_string()),
        };
        let updated = repo.update(user.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.username, "a");
        assert_eq!(updated.email, "new@x.com");
        assert_eq!(repo.find_by_id(user.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_to_own_values_is_allowed() {
        let repo = InMemoryUserRepository::new();
        let user = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        let changes = UserChanges {
            username: Some("a".to_string()),
            email: Some("a@x.com".to_string()),
        };
        assert!(repo.update(user.id, &changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_into_taken_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();
        let b = repo.save(&NewUser::new("b", "b@x.com")).await.unwrap();

        let changes = UserChanges {
            username: None,
            email: Some("a@x.com".to_string()),
        };
        let err = repo.update(b.id, &changes).await.unwrap_err();
        assert!(matches!(err, RosterError::Conflict(_)));
        assert_eq!(repo.find_by_id(b.id).await.unwrap().unwrap().email, "b@x.com");
    }

    #[tokio::test]
    async fn test_column_lengths_match_schema() {
        let repo = InMemoryUserRepository::new();

        let longest = repo
            .save(&NewUser::new("u".repeat(USERNAME_MAX_LEN), format!("{}@x.com", "e".repeat(EMAIL_MAX_LEN - 6))))
            .await
            .unwrap();
        assert_eq!(longest.username.chars().count(), USERNAME_MAX_LEN);
        assert_eq!(longest.email.chars().count(), EMAIL_MAX_LEN);

        let err = repo
            .save(&NewUser::new("u".repeat(USERNAME_MAX_LEN + 1), "a@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Database(_)));
        assert_eq!(err.status_code(), 500);

        let err = repo
            .save(&NewUser::new("b", format!("{}@x.com", "e".repeat(EMAIL_MAX_LEN))))
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Database(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_username() {
        let repo = InMemoryUserRepository::new();
        let user = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        let changes = UserChanges {
            username: Some("é".repeat(USERNAME_MAX_LEN + 1)),
            email: None,
        };
        let err = repo.update(user.id, &changes).await.unwrap_err();

        assert!(matches!(err, RosterError::Database(_)));
        assert_eq!(repo.find_by_id(user.id).await.unwrap().unwrap().username, "a");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update(UserId::new(9), &UserChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let a = repo.save(&NewUser::new("a", "a@x.com")).await.unwrap();
        repo.delete(a.id).await.unwrap();

        let b = repo.save(&NewUser::new("b", "b@x.com")).await.unwrap();
        assert_eq!(b.id, UserId::new(2));
    }
}
