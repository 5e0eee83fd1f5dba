//! Integration tests for PgUserRepository.
//!
//! These tests run against a real PostgreSQL database using testcontainers.
//! Requires Docker; run with `cargo test -- --ignored`.

mod common;

use common::TestDatabase;
use roster_core::{NewUser, RosterError, UserChanges, UserId, USERNAME_MAX_LEN};
use roster_repository::{PgUserRepository, UserRepository};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let saved = repo
        .save(&NewUser::new("testuser", "test@example.com"))
        .await
        .expect("Failed to save user");
    assert_eq!(saved.username, "testuser");

    let found = repo
        .find_by_id(saved.id)
        .await
        .expect("Failed to find user")
        .expect("User not found");

    assert_eq!(found, saved);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let result = repo.find_by_id(UserId::new(999)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    repo.save(&NewUser::new("first", "dup@example.com"))
        .await
        .expect("Failed to save user");

    let err = repo
        .save(&NewUser::new("second", "dup@example.com"))
        .await
        .expect_err("duplicate email must fail");
    assert!(matches!(err, RosterError::Conflict(_)));
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_ordered_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    for name in ["carol", "alice", "bob"] {
        repo.save(&NewUser::new(name, format!("{name}@example.com")))
            .await
            .expect("Failed to save user");
    }

    let users = repo.find_all().await.expect("Failed to list users");
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
    assert!(users.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_partial_update() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let user = repo
        .save(&NewUser::new("original", "original@example.com"))
        .await
        .unwrap();

    let changes = UserChanges {
        username: Some("renamed".to_string()),
        email: None,
    };
    let updated = repo
        .update(user.id, &changes)
        .await
        .expect("Update failed")
        .expect("User vanished");

    assert_eq!(updated.username, "renamed");
    assert_eq!(updated.email, "original@example.com");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_user_returns_none() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let changes = UserChanges {
        username: Some("ghost".to_string()),
        email: None,
    };
    assert!(repo.update(UserId::new(42), &changes).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let user = repo
        .save(&NewUser::new("todelete", "delete@example.com"))
        .await
        .unwrap();

    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());
    assert!(repo.find_by_id(user.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check() {
    let db = TestDatabase::new().await;
    db.pool().health_check().await.expect("health check failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_overlong_username_is_database_error() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let err = repo
        .save(&NewUser::new("u".repeat(USERNAME_MAX_LEN + 1), "long@example.com"))
        .await
        .expect_err("username longer than the column must fail");
    assert!(matches!(err, RosterError::Database(_)));
}
