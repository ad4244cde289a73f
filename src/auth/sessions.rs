/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for admin
 * sessions.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token lifetime: 30 days.
const TOKEN_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Username (the actor identity)
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|err| {
        tracing::warn!("Missing JWT_SECRET ({}); using development default", err);
        "change-me-in-production".to_string()
    })
}

/// Create a JWT token for an account
///
/// # Arguments
/// * `account_id` - Account ID (UUID)
/// * `username` - Account username
///
/// # Returns
/// JWT token string
pub fn create_token(
    account_id: uuid::Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let claims = Claims {
        sub: account_id.to_string(),
        username: username.to_string(),
        exp: now + TOKEN_LIFETIME_SECS,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_token() {
        let account_id = uuid::Uuid::new_v4();
        let token = create_token(account_id, "admin").unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_token_roundtrip() {
        let account_id = uuid::Uuid::new_v4();
        let token = create_token(account_id, "editor").unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.username, "editor");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token").is_err());
    }
}
