/**
 * Application State Management
 *
 * `AppState` is the central state container: the database pool, the
 * optional image-host client, the upload directory and the realtime
 * broadcast sender. The repository layer holds no other shared state —
 * everything mutable lives in the database.
 *
 * `FromRef` implementations let handlers extract just the part they
 * need instead of the whole state.
 */

use std::path::PathBuf;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::broadcast::ContentEventBroadcast;
use crate::upload::cloudinary::CloudinaryUploader;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, initialized once at startup.
    pub db_pool: PgPool,

    /// Remote image host client. `None` when Cloudinary is not
    /// configured; images then stay on local disk under `/files`.
    pub uploader: Option<CloudinaryUploader>,

    /// Directory multipart uploads are written to.
    pub upload_dir: PathBuf,

    /// Fire-and-forget notification channel announcing record creation.
    pub content_events: ContentEventBroadcast,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for ContentEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.content_events.clone()
    }
}
