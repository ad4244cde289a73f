/**
 * Account Model and Database Operations
 *
 * Admin accounts that author content. Accounts are soft-deleted via the
 * `is_destroyed` flag so audit fields keep pointing at a real username.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Account row. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_destroyed: bool,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ACCOUNT_COLUMNS: &str = "id, username, email, full_name, password_hash, is_destroyed, \
     created_by, updated_by, created_at, updated_at";

/// Create a new account
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username`, `email`, `full_name` - Profile fields
/// * `password_hash` - Already-hashed password
/// * `created_by` - Username of the creating admin
///
/// # Errors
///
/// `Conflict` when the username or email is already taken. The handler
/// pre-checks both, so this covers the race between check and insert.
pub async fn create_account(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
    created_by: &str,
) -> Result<Account, ApiError> {
    let now = Utc::now();

    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts
            (id, username, email, full_name, password_hash, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(created_by)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_account_conflict)?;

    Ok(account)
}

fn map_account_conflict(err: sqlx::Error) -> ApiError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.constraint() {
            Some("accounts_username_key") => return ApiError::conflict("Username already taken"),
            Some("accounts_email_key") => return ApiError::conflict("Email already registered"),
            _ => {}
        }
    }
    ApiError::Storage(err)
}

/// Get account by email
pub async fn get_account_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get account by username
pub async fn get_account_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Get account by ID
pub async fn get_account_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_map_account_conflict_passthrough() {
        // Non-constraint errors stay storage errors.
        let err = map_account_conflict(sqlx::Error::RowNotFound);
        assert_matches!(err, ApiError::Storage(_));
    }
}
