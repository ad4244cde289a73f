/**
 * API Error Types
 *
 * This module defines the error taxonomy used by every handler and
 * repository operation:
 *
 * - `Validation` (400) - malformed input (bad dates, empty titles, ...)
 * - `Unauthorized` (401) - missing/invalid credentials or token
 * - `NotFound` (404) - master or detail record does not exist
 * - `DuplicateTitle` / `Conflict` (409) - uniqueness or referential guards
 * - `CategoryNotFound` (400) - request body references a missing category
 * - `UploadFailed` (500) - image host rejected or transport failed
 * - `Storage` (500) - wraps sqlx errors; driver text is logged, never
 *   returned to the caller
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Typed failure surfaced at the API boundary.
///
/// Each variant carries enough context for a response message; the
/// `IntoResponse` impl in `conversion` renders the `{message, statusCode}`
/// envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request input (dates, UUIDs, missing required fields).
    #[error("{message}")]
    Validation { message: String },

    /// Missing or invalid credentials.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Master record, detail record or other entity does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// A record with this title already exists in the collection.
    #[error("A record with title '{title}' already exists")]
    DuplicateTitle { title: String },

    /// The referenced category does not exist.
    #[error("Category {id} does not exist")]
    CategoryNotFound { id: uuid::Uuid },

    /// Uniqueness or referential-integrity conflict other than titles
    /// (duplicate category name, category still referenced, ...).
    #[error("{message}")]
    Conflict { message: String },

    /// The image host rejected the upload or the transport failed.
    #[error("Upload failed: {message}")]
    UploadFailed { message: String },

    /// Underlying storage error. The driver error is kept for logging but
    /// callers only ever see a generic message.
    #[error("Storage unavailable")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed { message: message.into() }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateTitle { .. } => StatusCode::CONFLICT,
            Self::CategoryNotFound { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::UploadFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Storage errors are masked.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "Storage unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

/// Map an insert/update error to `DuplicateTitle` when the `(kind, title)`
/// unique index fired, otherwise wrap it as a storage error.
pub fn map_title_conflict(err: sqlx::Error, title: &str) -> ApiError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some("content_items_kind_title_key") {
            return ApiError::DuplicateTitle { title: title.to_string() };
        }
    }
    ApiError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad date").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::DuplicateTitle { title: "A".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::CategoryNotFound { id: uuid::Uuid::new_v4() }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::upload_failed("remote 500").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Storage(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_is_masked() {
        let err = ApiError::Storage(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Storage unavailable");
    }

    #[test]
    fn test_duplicate_title_message() {
        let err = ApiError::DuplicateTitle { title: "Budget 2026".into() };
        assert!(err.public_message().contains("Budget 2026"));
    }

    #[test]
    fn test_map_title_conflict_passthrough() {
        // Non-database errors stay storage errors.
        let err = map_title_conflict(sqlx::Error::RowNotFound, "A");
        assert_matches!(err, ApiError::Storage(_));
    }
}
