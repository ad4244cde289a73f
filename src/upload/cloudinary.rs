/**
 * Image Host Client
 *
 * Uploads a file from disk to a Cloudinary-style image host using an
 * unsigned upload preset and returns the hosted `secure_url`. Any
 * transport or remote failure surfaces as `UploadFailed`; the caller
 * decides whether that aborts the operation (create) or not (update).
 */

use std::path::Path;

use serde::Deserialize;

use crate::error::ApiError;

/// Successful upload response. Only `secure_url` is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
}

/// Client for the remote image host.
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    /// Build a client from `CLOUDINARY_CLOUD_NAME` and
    /// `CLOUDINARY_UPLOAD_PRESET`. Returns `None` when either is unset;
    /// the server then falls back to local-disk image URLs.
    pub fn from_env() -> Option<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET").ok()?;
        let endpoint = format!("https://api.cloudinary.com/v1_1/{cloud_name}/image/upload");
        Some(Self::new(endpoint, upload_preset))
    }

    /// Build a client against an explicit endpoint. Tests point this at a
    /// mock server.
    pub fn new(endpoint: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            upload_preset: upload_preset.into(),
        }
    }

    /// Upload a file and return its hosted URL.
    ///
    /// # Errors
    ///
    /// `UploadFailed` on unreadable file, transport error, non-2xx
    /// response or unparseable body.
    pub async fn upload(&self, file_path: &Path) -> Result<UploadedImage, ApiError> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            ApiError::upload_failed(format!("cannot read {}: {}", file_path.display(), e))
        })?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Image upload transport error: {:?}", e);
                ApiError::upload_failed("image host unreachable")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Image host rejected upload: {}", status);
            return Err(ApiError::upload_failed(format!("image host returned {status}")));
        }

        let uploaded: UploadedImage = response.json().await.map_err(|e| {
            tracing::error!("Unparseable image host response: {:?}", e);
            ApiError::upload_failed("invalid image host response")
        })?;

        tracing::info!("Uploaded image to {}", uploaded.secure_url);
        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn temp_image() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cover.jpg");
        tokio::fs::write(&file, b"jpeg-bytes").await.unwrap();
        (dir, file)
    }

    #[tokio::test]
    async fn test_upload_success_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://img.example.com/cover.jpg",
                "public_id": "cover"
            })))
            .mount(&server)
            .await;

        let uploader =
            CloudinaryUploader::new(format!("{}/image/upload", server.uri()), "preset");
        let (_dir, file) = temp_image().await;

        let uploaded = uploader.upload(&file).await.unwrap();
        assert_eq!(uploaded.secure_url, "https://img.example.com/cover.jpg");
    }

    #[tokio::test]
    async fn test_remote_error_is_upload_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/image/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let uploader =
            CloudinaryUploader::new(format!("{}/image/upload", server.uri()), "preset");
        let (_dir, file) = temp_image().await;

        let err = uploader.upload(&file).await.unwrap_err();
        assert_matches!(err, ApiError::UploadFailed { .. });
    }

    #[tokio::test]
    async fn test_missing_file_is_upload_failed() {
        let uploader = CloudinaryUploader::new("http://127.0.0.1:1/image/upload", "preset");
        let err = uploader
            .upload(Path::new("/nonexistent/cover.jpg"))
            .await
            .unwrap_err();
        assert_matches!(err, ApiError::UploadFailed { .. });
    }
}
