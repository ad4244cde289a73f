/**
 * Upload Collaborators
 *
 * Two homes for uploaded files: local disk (always available, served back
 * under `/files`) and the remote image host (optional, configured from the
 * environment). Content handlers prefer the image host and fall back to
 * the local URL when it is not configured.
 */

pub mod cloudinary;
pub mod local;

pub use cloudinary::{CloudinaryUploader, UploadedImage};
pub use local::StoredFile;
