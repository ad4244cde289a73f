/**
 * Success Response Envelope
 *
 * Every successful endpoint responds with the same wrapper:
 *
 * ```json
 * { "data": ..., "message": "Get news successful", "statusCode": 200 }
 * ```
 */

use axum::Json;
use serde::Serialize;

/// Uniform `{data, message, statusCode}` wrapper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
    pub status_code: u16,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload as a 200 response.
    pub fn ok(data: T, message: impl Into<String>) -> Json<Envelope<T>> {
        Json(Envelope {
            data,
            message: message.into(),
            status_code: 200,
        })
    }
}
