/**
 * Server Configuration
 *
 * Configuration comes from environment variables:
 *
 * - `DATABASE_URL` (required) - PostgreSQL connection string
 * - `SERVER_PORT` (default 3000)
 * - `UPLOAD_DIR` (default `uploads`)
 * - `CLOUDINARY_CLOUD_NAME` / `CLOUDINARY_UPLOAD_PRESET` (optional) -
 *   enable the remote image host
 * - `JWT_SECRET` - token signing key
 *
 * Unlike optional services, the database is a hard requirement: every
 * endpoint is database-backed, so startup fails fast without it.
 */

use std::path::PathBuf;

use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connect to the database and run embedded migrations.
pub async fn load_database() -> Result<PgPool, ConfigError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        tracing::error!("DATABASE_URL not set");
        ConfigError::MissingDatabaseUrl
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Directory uploaded files are stored in.
pub fn upload_dir() -> PathBuf {
    std::env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"))
}

/// Port the HTTP server binds to.
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(3000)
}
