/**
 * Server Initialization
 *
 * Builds the application: database pool + migrations, optional image
 * host client, the realtime broadcast channel and the router.
 */

use axum::Router;
use tokio::sync::broadcast;

use crate::realtime::broadcast::ContentEvent;
use crate::routes::router::create_router;
use crate::server::config::{load_database, upload_dir, ConfigError};
use crate::server::state::AppState;
use crate::upload::cloudinary::CloudinaryUploader;

/// Broadcast capacity. Events are small and subscribers few; lagged
/// subscribers skip ahead rather than block anyone.
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Create and configure the application router.
pub async fn create_app() -> Result<Router, ConfigError> {
    tracing::info!("Initializing portal-cms backend server");

    let db_pool = load_database().await?;

    let uploader = CloudinaryUploader::from_env();
    match uploader {
        Some(_) => tracing::info!("Image host configured, uploads go to Cloudinary"),
        None => tracing::warn!("Image host not configured, uploads stay on local disk"),
    }

    let (content_events, _) = broadcast::channel::<ContentEvent>(EVENT_CHANNEL_CAPACITY);

    let app_state = AppState {
        db_pool,
        uploader,
        upload_dir: upload_dir(),
        content_events,
    };

    tracing::info!("Router configured");
    Ok(create_router(app_state))
}
