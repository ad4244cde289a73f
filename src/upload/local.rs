/**
 * Local Disk Storage
 *
 * Multipart uploads are first written under the configured upload
 * directory. Filenames are sanitized and prefixed with a UUID so client
 * names can never collide or escape the directory.
 */

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A file persisted to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Original client filename, after sanitizing.
    pub filename: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// URL the file is served back under (`/files/...`).
    pub public_url: String,
}

/// Write an uploaded file to disk.
pub async fn save_upload(
    upload_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<StoredFile> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let filename = sanitize_filename(original_name);
    let stored_name = format!("{}-{}", Uuid::new_v4(), filename);
    let path = upload_dir.join(&stored_name);

    tokio::fs::write(&path, bytes).await?;
    tracing::debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());

    Ok(StoredFile {
        filename,
        path,
        public_url: format!("/files/{stored_name}"),
    })
}

/// Best-effort removal of a stored file. Failures are logged, never
/// propagated; a missing file must not fail the surrounding delete.
pub async fn remove_upload(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        tracing::warn!("Failed to delete file {}: {:?}", path.display(), err);
    }
}

/// Resolve a `/files/...` URL back to its on-disk path, rejecting
/// anything that tries to leave the upload directory.
pub fn resolve_public_url(upload_dir: &Path, url: &str) -> Option<PathBuf> {
    let name = url.strip_prefix("/files/")?;
    if name.is_empty() || name.contains('/') || name.contains("..") {
        return None;
    }
    Some(upload_dir.join(name))
}

fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_save_and_remove_upload() {
        let dir = tempfile::tempdir().unwrap();
        let stored = save_upload(dir.path(), "photo.png", b"png-bytes")
            .await
            .unwrap();

        assert!(stored.path.exists());
        assert!(stored.public_url.starts_with("/files/"));
        assert!(stored.public_url.ends_with("photo.png"));
        assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), b"png-bytes");

        remove_upload(&stored.path).await;
        assert!(!stored.path.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        remove_upload(&dir.path().join("never-existed.pdf")).await;
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("bao cao 2026.pdf"), "bao_cao_2026.pdf");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_resolve_public_url_guards_traversal() {
        let dir = Path::new("/var/uploads");
        assert!(resolve_public_url(dir, "/files/a.png").is_some());
        assert!(resolve_public_url(dir, "/files/../secret").is_none());
        assert!(resolve_public_url(dir, "/elsewhere/a.png").is_none());
        assert!(resolve_public_url(dir, "/files/").is_none());
    }
}
