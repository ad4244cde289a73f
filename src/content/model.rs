/**
 * Content Data Model
 *
 * Row structs for the shared `content_items` / `content_details` tables
 * and the `ContentKind` discriminator that turns the generic repository
 * into the four concrete collections.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator for the four content collections sharing the
/// master/detail table pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    News,
    Action,
    Service,
    Project,
}

impl ContentKind {
    /// Value stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Action => "action",
            Self::Service => "service",
            Self::Project => "project",
        }
    }

    /// Event name announced on the realtime channel when a record of this
    /// kind is created.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::News => "newsAdded",
            Self::Action => "actionAdded",
            Self::Service => "serviceAdded",
            Self::Project => "projectAdded",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Master record: the card fields of a content item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
    /// Incremented by exactly 1 on every get-by-id read.
    pub views: i32,
    pub is_featured: bool,
    /// URL set when an image upload succeeded (cloud host or local disk).
    pub image: Option<String>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail record: the long-form body, 1:1 with its master row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetail {
    pub id: Uuid,
    pub item_id: Uuid,
    pub content: String,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Master record merged with its body, as returned by get-by-id and
/// search. Search tolerates a missing detail (`content: null`), get-by-id
/// does not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentWithBody {
    #[serde(flatten)]
    pub item: ContentItem,
    pub content: Option<String>,
}

/// Fields accepted when creating a content item.
///
/// `image` is the already-resolved URL; the upload itself happens in the
/// handler before the repository is called.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub summary: String,
    pub category_id: Uuid,
    pub is_featured: bool,
    pub image: Option<String>,
    pub content: String,
}

/// Explicit update payload. Every optional field is enumerated;
/// unrecognized fields are rejected rather than passed through.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateContent {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub content: Option<String>,
}

impl UpdateContent {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.category_id.is_none()
            && self.is_featured.is_none()
            && self.content.is_none()
    }
}

/// Result of an update: both records, mirroring the two writes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdateResult {
    pub item: ContentItem,
    pub detail: ContentDetail,
}

/// One page of results plus the aggregate counts computed from the same
/// filter predicate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPage<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_column_values() {
        assert_eq!(ContentKind::News.as_str(), "news");
        assert_eq!(ContentKind::Action.as_str(), "action");
        assert_eq!(ContentKind::Service.as_str(), "service");
        assert_eq!(ContentKind::Project.as_str(), "project");
    }

    #[test]
    fn test_kind_event_names() {
        assert_eq!(ContentKind::News.event_name(), "newsAdded");
        assert_eq!(ContentKind::Project.event_name(), "projectAdded");
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let result: Result<UpdateContent, _> = serde_json::from_value(serde_json::json!({
            "title": "New title",
            "viewCount": 99
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_all_fields_optional() {
        let update: UpdateContent = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_content_with_body_flattens() {
        let item = ContentItem {
            id: Uuid::new_v4(),
            title: "A".into(),
            summary: "S".into(),
            category_id: Uuid::new_v4(),
            views: 0,
            is_featured: false,
            image: None,
            created_by: "admin".into(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let with_body = ContentWithBody { item, content: Some("body".into()) };
        let value = serde_json::to_value(&with_body).unwrap();
        assert_eq!(value["title"], "A");
        assert_eq!(value["content"], "body");
        assert_eq!(value["views"], 0);
    }
}
