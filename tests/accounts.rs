//! Account integration tests
//!
//! Requires DATABASE_URL; run with `cargo test -- --ignored`.

mod common;

use assert_matches::assert_matches;
use bcrypt::{hash, verify, DEFAULT_COST};
use serial_test::serial;

use portal_cms::auth::accounts::{
    create_account, get_account_by_email, get_account_by_username,
};
use portal_cms::error::ApiError;

use common::TestDatabase;

#[tokio::test]
#[serial]
#[ignore]
async fn test_account_roundtrip_by_username_and_email() {
    let db = TestDatabase::new().await;

    let password_hash = hash("s3cret-pass", DEFAULT_COST).unwrap();
    let account = create_account(
        db.pool(),
        "editor1",
        "editor1@example.com",
        "First Editor",
        &password_hash,
        "admin",
    )
    .await
    .unwrap();
    assert!(!account.is_destroyed);
    assert_eq!(account.created_by, "admin");

    let by_username = get_account_by_username(db.pool(), "editor1")
        .await
        .unwrap()
        .expect("account by username");
    assert_eq!(by_username.id, account.id);
    assert!(verify("s3cret-pass", &by_username.password_hash).unwrap());

    let by_email = get_account_by_email(db.pool(), "editor1@example.com")
        .await
        .unwrap()
        .expect("account by email");
    assert_eq!(by_email.id, account.id);

    assert!(get_account_by_username(db.pool(), "nobody")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_duplicate_username_or_email_conflicts() {
    let db = TestDatabase::new().await;

    let password_hash = hash("s3cret-pass", DEFAULT_COST).unwrap();
    create_account(db.pool(), "editor1", "a@example.com", "A", &password_hash, "admin")
        .await
        .unwrap();

    // Taken username, even past the handler pre-checks.
    let err = create_account(db.pool(), "editor1", "b@example.com", "B", &password_hash, "admin")
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Conflict { .. });

    // Taken email.
    let err = create_account(db.pool(), "editor2", "a@example.com", "B", &password_hash, "admin")
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Conflict { .. });
}
