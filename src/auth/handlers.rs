/**
 * Auth Handlers
 *
 * - `POST /account/login` - verify credentials, return a JWT and profile
 * - `GET  /account/me`    - profile of the authenticated account
 * - `POST /account`       - create an account (authenticated admins only)
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt and never returned or logged
 * - Unknown user and wrong password both answer 401 "Invalid credentials"
 * - Soft-deleted accounts cannot log in
 */

use axum::{extract::State, Extension, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::accounts::{
    create_account, get_account_by_email, get_account_by_id, get_account_by_username, Account,
};
use crate::auth::sessions::create_token;
use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedAccount;
use crate::response::Envelope;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub account: Account,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Login handler (POST /account/login).
///
/// # Errors
///
/// * `401 Unauthorized` - unknown account, wrong password or destroyed
///   account (all answer the same message to avoid user enumeration)
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    tracing::info!("Login request for: {}", request.username);

    // Accept either a username or an email in the same field.
    let account = if request.username.contains('@') {
        get_account_by_email(&pool, &request.username).await?
    } else {
        get_account_by_username(&pool, &request.username).await?
    };

    let account = account.ok_or_else(|| {
        tracing::warn!("Account not found: {}", request.username);
        ApiError::unauthorized("Invalid credentials")
    })?;

    if account.is_destroyed {
        tracing::warn!("Login attempt for destroyed account: {}", account.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let valid = verify(&request.password, &account.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        ApiError::unauthorized("Invalid credentials")
    })?;
    if !valid {
        tracing::warn!("Wrong password for: {}", account.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = create_token(account.id, &account.username).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        ApiError::unauthorized("Login failed")
    })?;

    tracing::info!("Login successful: {}", account.username);
    Ok(Envelope::ok(LoginResponse { token, account }, "Login successful"))
}

/// Current account handler (GET /account/me).
pub async fn me(
    State(pool): State<PgPool>,
    Extension(actor): Extension<AuthenticatedAccount>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    let account = get_account_by_id(&pool, actor.account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Envelope::ok(account, "Get account successful"))
}

/// Create-account handler (POST /account). Only reachable behind the auth
/// middleware; the actor becomes the new account's `createdBy`.
pub async fn add_account(
    State(pool): State<PgPool>,
    Extension(actor): Extension<AuthenticatedAccount>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<Envelope<Account>>, ApiError> {
    if !is_valid_username(&request.username) {
        return Err(ApiError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !request.email.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation("Password must be at least 8 characters"));
    }
    if request.full_name.trim().is_empty() {
        return Err(ApiError::validation("Full name is required"));
    }

    if get_account_by_username(&pool, &request.username).await?.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }
    if get_account_by_email(&pool, &request.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        ApiError::validation("Unusable password")
    })?;

    let account = create_account(
        &pool,
        &request.username,
        &request.email,
        &request.full_name,
        &password_hash,
        &actor.username,
    )
    .await?;

    tracing::info!("Account created: {} by {}", account.username, actor.username);
    Ok(Envelope::ok(account, "Add account successful"))
}

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("admin"));
        assert!(is_valid_username("editor_2"));
        assert!(is_valid_username("abc"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("1admin"));
        assert!(!is_valid_username("_admin"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn test_create_account_request_rejects_unknown_fields() {
        let result: Result<CreateAccountRequest, _> =
            serde_json::from_value(serde_json::json!({
                "username": "admin",
                "email": "a@b.c",
                "fullName": "Admin",
                "password": "longenough",
                "isAdmin": true
            }));
        assert!(result.is_err());
    }
}
