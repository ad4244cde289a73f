/**
 * Authentication Middleware
 *
 * Protects write routes. Extracts and verifies the bearer token from the
 * Authorization header and attaches the authenticated account (the actor
 * identity used for createdBy/updatedBy) to request extensions.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::accounts::get_account_by_id;
use crate::auth::sessions::verify_token;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Actor identity extracted from a verified token.
#[derive(Clone, Debug)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub username: String,
}

/// Authentication middleware
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the token
/// 3. Confirms the account still exists and is not destroyed
/// 4. Attaches `AuthenticatedAccount` to request extensions
///
/// Returns 401 Unauthorized if any step fails.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            ApiError::unauthorized("Missing Authorization header")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        ApiError::unauthorized("Invalid Authorization header")
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let account_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::error!("Invalid account ID in token: {:?}", e);
        ApiError::unauthorized("Invalid token")
    })?;

    let account = verify_account(&app_state.db_pool, account_id).await?;

    request.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        username: account,
    });

    Ok(next.run(request).await)
}

/// Confirm the account behind a token still exists and is usable.
async fn verify_account(pool: &PgPool, account_id: Uuid) -> Result<String, ApiError> {
    let account = get_account_by_id(pool, account_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown account: {}", account_id);
            ApiError::unauthorized("Account no longer exists")
        })?;

    if account.is_destroyed {
        tracing::warn!("Token for destroyed account: {}", account.username);
        return Err(ApiError::unauthorized("Account no longer exists"));
    }

    Ok(account.username)
}
