/**
 * Content Repository Operations
 *
 * All storage access for a content kind. The repository owns no state
 * besides the pool and its kind; every request works directly against
 * PostgreSQL.
 *
 * # Atomicity
 *
 * - `create` and `delete` run the master and detail writes inside one
 *   transaction, so a failed detail write can never leave an orphan
 *   master row.
 * - The view-count bump in `get_by_id` is a single
 *   `UPDATE ... views = views + 1 ... RETURNING`, never a read-then-write
 *   pair, so concurrent reads cannot lose increments.
 * - List and search compute the page and the total count from the same
 *   predicate builder.
 */

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::content::filter::ContentFilter;
use crate::content::model::{
    ContentDetail, ContentItem, ContentKind, ContentPage, ContentUpdateResult, ContentWithBody,
    NewContent, UpdateContent,
};
use crate::error::types::map_title_conflict;
use crate::error::ApiError;

/// Fixed slice sizes for the two landing-page queries.
const TOP_VIEWS_LIMIT: i64 = 8;
const FEATURED_LIMIT: i64 = 5;

const ITEM_COLUMNS: &str = "id, title, summary, category_id, views, is_featured, image, \
     created_by, updated_by, created_at, updated_at";

/// Master-detail repository bound to one content kind.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
    kind: ContentKind,
}

impl ContentRepository {
    pub fn new(pool: PgPool, kind: ContentKind) -> Self {
        Self { pool, kind }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Create a master record and its detail in one transaction.
    ///
    /// # Errors
    ///
    /// * `CategoryNotFound` - `category_id` does not resolve
    /// * `DuplicateTitle` - a record with this title already exists in the
    ///   collection (checked explicitly, then backed by the unique index)
    /// * `Storage` - any other database failure; the transaction rolls
    ///   back, so no partial record survives
    pub async fn create(&self, input: NewContent, actor: &str) -> Result<ContentItem, ApiError> {
        let mut tx = self.pool.begin().await?;

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(input.category_id)
                .fetch_one(&mut *tx)
                .await?;
        if !category_exists {
            return Err(ApiError::CategoryNotFound { id: input.category_id });
        }

        let title_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM content_items WHERE kind = $1 AND title = $2)",
        )
        .bind(self.kind.as_str())
        .bind(&input.title)
        .fetch_one(&mut *tx)
        .await?;
        if title_taken {
            return Err(ApiError::DuplicateTitle { title: input.title });
        }

        let item_id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let item = sqlx::query_as::<_, ContentItem>(
            r#"
            INSERT INTO content_items
                (id, kind, title, summary, category_id, is_featured, image,
                 created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING id, title, summary, category_id, views, is_featured, image,
                      created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(self.kind.as_str())
        .bind(&input.title)
        .bind(&input.summary)
        .bind(input.category_id)
        .bind(input.is_featured)
        .bind(&input.image)
        .bind(actor)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_title_conflict(e, &input.title))?;

        sqlx::query(
            r#"
            INSERT INTO content_details
                (id, item_id, content, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item_id)
        .bind(&input.content)
        .bind(actor)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("[{}] Created '{}' ({})", self.kind, item.title, item.id);
        Ok(item)
    }

    /// One page of master records, newest first, with totals computed
    /// from the identical predicate.
    pub async fn list(&self, filter: &ContentFilter) -> Result<ContentPage<ContentItem>, ApiError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM content_items");
        self.push_list_predicate(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM content_items"
        ));
        self.push_list_predicate(&mut page_query, filter);
        page_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let items = page_query
            .build_query_as::<ContentItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ContentPage {
            items,
            current_page: filter.page,
            total_pages: total_pages(total_count, filter.limit),
            total_count,
        })
    }

    /// Fetch one record with its body, bumping the view count as part of
    /// the same read.
    ///
    /// A master without a detail is a data-integrity error and surfaces
    /// as `NotFound` rather than an empty body.
    pub async fn get_by_id(&self, id: Uuid) -> Result<ContentWithBody, ApiError> {
        let item = sqlx::query_as::<_, ContentItem>(
            r#"
            UPDATE content_items SET views = views + 1
            WHERE id = $1 AND kind = $2
            RETURNING id, title, summary, category_id, views, is_featured, image,
                      created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(self.kind.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found with id: {}", self.kind, id)))?;

        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM content_details WHERE item_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(content) = content else {
            tracing::error!("[{}] Detail row missing for item {}", self.kind, id);
            return Err(ApiError::not_found(format!(
                "{} detail not found with id: {}",
                self.kind, id
            )));
        };

        Ok(ContentWithBody { item, content: Some(content) })
    }

    /// Apply an explicit update to the master and upsert the detail.
    ///
    /// The detail upsert self-heals a missing row instead of failing: a
    /// supplied body replaces the old one, an absent body keeps it.
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateContent,
        image: Option<String>,
        actor: &str,
    ) -> Result<ContentUpdateResult, ApiError> {
        if let Some(category_id) = changes.category_id {
            let category_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(category_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !category_exists {
                return Err(ApiError::CategoryNotFound { id: category_id });
            }
        }

        let now = chrono::Utc::now();
        let new_title = changes.title.clone().unwrap_or_default();

        let mut update_query =
            QueryBuilder::<Postgres>::new("UPDATE content_items SET updated_by = ");
        update_query.push_bind(actor.to_string());
        update_query.push(", updated_at = ").push_bind(now);
        if let Some(title) = &changes.title {
            update_query.push(", title = ").push_bind(title.clone());
        }
        if let Some(summary) = &changes.summary {
            update_query.push(", summary = ").push_bind(summary.clone());
        }
        if let Some(category_id) = changes.category_id {
            update_query.push(", category_id = ").push_bind(category_id);
        }
        if let Some(is_featured) = changes.is_featured {
            update_query.push(", is_featured = ").push_bind(is_featured);
        }
        if let Some(image) = &image {
            update_query.push(", image = ").push_bind(image.clone());
        }
        update_query.push(" WHERE id = ").push_bind(id);
        update_query.push(" AND kind = ").push_bind(self.kind.as_str());
        update_query.push(format!(" RETURNING {ITEM_COLUMNS}"));

        let item = update_query
            .build_query_as::<ContentItem>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_title_conflict(e, &new_title))?
            .ok_or_else(|| {
                ApiError::not_found(format!("{} not found with id: {}", self.kind, id))
            })?;

        let detail = sqlx::query_as::<_, ContentDetail>(
            r#"
            INSERT INTO content_details
                (id, item_id, content, created_by, created_at, updated_at)
            VALUES ($1, $2, COALESCE($3, ''), $4, $5, $5)
            ON CONFLICT (item_id) DO UPDATE
                SET content = COALESCE($3, content_details.content),
                    updated_by = $4,
                    updated_at = $5
            RETURNING id, item_id, content, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(&changes.content)
        .bind(actor)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("[{}] Updated {} by {}", self.kind, id, actor);
        Ok(ContentUpdateResult { item, detail })
    }

    /// Delete the detail and the master as one logical operation.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM content_details WHERE item_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM content_items WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(self.kind.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Transaction dropped here, the detail delete rolls back.
            return Err(ApiError::not_found(format!(
                "{} not found with id: {}",
                self.kind, id
            )));
        }

        tx.commit().await?;
        tracing::info!("[{}] Deleted {}", self.kind, id);
        Ok(())
    }

    /// Case-insensitive search over title and summary with the same
    /// pagination and date-range composition as `list`, plus the body of
    /// each hit joined in one batched lookup.
    pub async fn search(
        &self,
        term: &str,
        filter: &ContentFilter,
    ) -> Result<ContentPage<ContentWithBody>, ApiError> {
        let pattern = format!("%{}%", escape_like(term));

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM content_items");
        self.push_search_predicate(&mut count_query, &pattern, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM content_items"
        ));
        self.push_search_predicate(&mut page_query, &pattern, filter);
        page_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let items = page_query
            .build_query_as::<ContentItem>()
            .fetch_all(&self.pool)
            .await?;

        // Single batched detail lookup, never one query per hit.
        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        let details: Vec<(Uuid, String)> = if ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                "SELECT item_id, content FROM content_details WHERE item_id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?
        };
        let bodies: std::collections::HashMap<Uuid, String> = details.into_iter().collect();

        let items = items
            .into_iter()
            .map(|item| {
                let content = bodies.get(&item.id).cloned();
                ContentWithBody { item, content }
            })
            .collect();

        Ok(ContentPage {
            items,
            current_page: filter.page,
            total_pages: total_pages(total_count, filter.limit),
            total_count,
        })
    }

    /// The 8 most viewed records, descending.
    pub async fn top_views(&self) -> Result<Vec<ContentItem>, ApiError> {
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT id, title, summary, category_id, views, is_featured, image,
                   created_by, updated_by, created_at, updated_at
            FROM content_items
            WHERE kind = $1
            ORDER BY views DESC
            LIMIT $2
            "#,
        )
        .bind(self.kind.as_str())
        .bind(TOP_VIEWS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The 5 newest featured records.
    pub async fn featured(&self) -> Result<Vec<ContentItem>, ApiError> {
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT id, title, summary, category_id, views, is_featured, image,
                   created_by, updated_by, created_at, updated_at
            FROM content_items
            WHERE kind = $1 AND is_featured = TRUE
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(self.kind.as_str())
        .bind(FEATURED_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    fn push_list_predicate(&self, query: &mut QueryBuilder<'_, Postgres>, filter: &ContentFilter) {
        query.push(" WHERE kind = ").push_bind(self.kind.as_str());
        if let Some(category_id) = filter.category_id {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(start) = filter.start_date {
            query.push(" AND created_at >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND created_at <= ").push_bind(end);
        }
    }

    fn push_search_predicate(
        &self,
        query: &mut QueryBuilder<'_, Postgres>,
        pattern: &str,
        filter: &ContentFilter,
    ) {
        query.push(" WHERE kind = ").push_bind(self.kind.as_str());
        query
            .push(" AND (title ILIKE ")
            .push_bind(pattern.to_string())
            .push(" OR summary ILIKE ")
            .push_bind(pattern.to_string())
            .push(")");
        if let Some(start) = filter.start_date {
            query.push(" AND created_at >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND created_at <= ").push_bind(end);
        }
    }
}

fn total_pages(total_count: i64, limit: i64) -> i64 {
    if total_count == 0 {
        0
    } else {
        (total_count + limit - 1) / limit
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 5), 5);
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
