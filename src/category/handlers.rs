/**
 * Category Handlers
 */

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::category::db;
use crate::category::db::Category;
use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedAccount;
use crate::response::Envelope;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub cat_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

/// GET /category
pub async fn get_categories(
    State(pool): State<PgPool>,
) -> Result<Json<Envelope<Vec<Category>>>, ApiError> {
    let categories = db::list_categories(&pool).await?;
    Ok(Envelope::ok(categories, "Get categories successful"))
}

/// GET /category/type/{type}
pub async fn get_categories_by_type(
    State(pool): State<PgPool>,
    Path(cat_type): Path<String>,
) -> Result<Json<Envelope<Vec<Category>>>, ApiError> {
    let categories = db::list_categories_by_type(&pool, &cat_type).await?;
    Ok(Envelope::ok(categories, "Get categories successful"))
}

/// POST /category
pub async fn add_category(
    State(pool): State<PgPool>,
    Extension(actor): Extension<AuthenticatedAccount>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Json<Envelope<Category>>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Category name is required"));
    }
    if request.cat_type.trim().is_empty() {
        return Err(ApiError::validation("Category type is required"));
    }

    let category =
        db::create_category(&pool, name, request.cat_type.trim(), &actor.username).await?;
    Ok(Envelope::ok(category, "Add category successful"))
}

/// PUT /category/{id}
pub async fn update_category(
    State(pool): State<PgPool>,
    Extension(actor): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Envelope<Category>>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Category name is required"));
    }

    let category = db::update_category(&pool, id, name, &actor.username).await?;
    Ok(Envelope::ok(category, "Update category successful"))
}

/// DELETE /category/{id}
pub async fn delete_category(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<bool>>, ApiError> {
    db::delete_category(&pool, id).await?;
    Ok(Envelope::ok(true, "Delete category successful"))
}
