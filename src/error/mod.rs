/**
 * Error Handling
 *
 * This module defines the typed error surface of the API. Every failure
 * that crosses the component boundary is one `ApiError` variant with a
 * stable status code and a human-readable message.
 */

pub mod types;
pub mod conversion;

pub use types::ApiError;
