/**
 * Category Model and Database Operations
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::slug::slugify;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub cat_type: String,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const CATEGORY_COLUMNS: &str =
    "id, name, slug, cat_type, created_by, updated_by, created_at, updated_at";

/// All categories.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Categories of one type (news categories, service categories, ...).
pub async fn list_categories_by_type(
    pool: &PgPool,
    cat_type: &str,
) -> Result<Vec<Category>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE cat_type = $1 ORDER BY created_at DESC"
    ))
    .bind(cat_type)
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Create a category. The slug is derived from the name.
///
/// # Errors
///
/// `Conflict` when a category with this name already exists.
pub async fn create_category(
    pool: &PgPool,
    name: &str,
    cat_type: &str,
    actor: &str,
) -> Result<Category, ApiError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await?;
    if exists {
        return Err(ApiError::conflict("Category already exists"));
    }

    let now = Utc::now();
    let category = sqlx::query_as::<_, Category>(&format!(
        r#"
        INSERT INTO categories (id, name, slug, cat_type, created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slugify(name))
    .bind(cat_type)
    .bind(actor)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_name_conflict)?;

    tracing::info!("Category created: '{}' by {}", category.name, actor);
    Ok(category)
}

/// Rename a category; the slug follows the new name.
pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    actor: &str,
) -> Result<Category, ApiError> {
    let category = sqlx::query_as::<_, Category>(&format!(
        r#"
        UPDATE categories
        SET name = $2, slug = $3, updated_by = $4, updated_at = $5
        WHERE id = $1
        RETURNING {CATEGORY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(slugify(name))
    .bind(actor)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(map_name_conflict)?
    .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(category)
}

/// Delete a category unless content still references it.
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(ApiError::not_found("Category not found"));
    }

    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM content_items WHERE category_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if referenced {
        return Err(ApiError::conflict(
            "Cannot delete category with associated content",
        ));
    }

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::info!("Category deleted: {}", id);
    Ok(())
}

fn map_name_conflict(err: sqlx::Error) -> ApiError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some("categories_name_key") {
            return ApiError::conflict("Category already exists");
        }
    }
    ApiError::Storage(err)
}
