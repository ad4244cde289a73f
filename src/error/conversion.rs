/**
 * Error Conversion
 *
 * `ApiError` implements `IntoResponse` so handlers can return
 * `Result<_, ApiError>` directly. Errors render as the uniform envelope:
 *
 * ```json
 * { "message": "Category abc does not exist", "statusCode": 400 }
 * ```
 */

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.public_message();

        if let ApiError::Storage(ref err) = self {
            tracing::error!("Storage error: {:?}", err);
        }

        let body = serde_json::json!({
            "message": message,
            "statusCode": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap_or_else(|_| {
                format!(r#"{{"message":"{}","statusCode":{}}}"#, message, status.as_u16())
            })))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = ApiError::not_found("News not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_response_is_json() {
        let response = ApiError::validation("Invalid start date format").into_response();
        let content_type = response
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "application/json");
    }
}
