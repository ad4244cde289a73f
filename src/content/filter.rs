/**
 * List and Search Filters
 *
 * Query-string DTOs and their validated form. Date parameters accept
 * RFC 3339 timestamps or plain `YYYY-MM-DD` dates; a bare end date is
 * widened to the end of that day so the range stays inclusive. Malformed
 * dates are a 400, not a silent no-op.
 */

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Raw query parameters for list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Raw query parameters for search endpoints. `data` is the search term,
/// matching the original API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub data: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated filter applied identically to the page query and the count
/// query.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub page: i64,
    pub limit: i64,
    pub category_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ContentFilter {
    pub fn from_list_query(query: ListQuery) -> Result<Self, ApiError> {
        let category_id = match query.category_id {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|_| ApiError::validation("Invalid category id"))?,
            ),
            None => None,
        };

        Ok(Self {
            page: normalize(query.page, DEFAULT_PAGE),
            limit: normalize(query.limit, DEFAULT_LIMIT),
            category_id,
            start_date: parse_date_param(query.start_date.as_deref(), Bound::Start)?,
            end_date: parse_date_param(query.end_date.as_deref(), Bound::End)?,
        })
    }

    pub fn from_search_query(query: &SearchQuery) -> Result<Self, ApiError> {
        Ok(Self {
            page: normalize(query.page, DEFAULT_PAGE),
            limit: normalize(query.limit, DEFAULT_LIMIT),
            category_id: None,
            start_date: parse_date_param(query.start_date.as_deref(), Bound::Start)?,
            end_date: parse_date_param(query.end_date.as_deref(), Bound::End)?,
        })
    }

    /// Offset-based pagination: skip `limit * (page - 1)` rows.
    pub fn offset(&self) -> i64 {
        self.limit * (self.page - 1)
    }
}

/// Which side of the range a bare date widens towards.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn normalize(value: Option<i64>, default: i64) -> i64 {
    value.unwrap_or(default).max(1)
}

fn parse_date_param(raw: Option<&str>, bound: Bound) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            // Inclusive upper bound: the whole end day matches.
            Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        };
        return Ok(Some(DateTime::from_naive_utc_and_offset(date.and_time(time), Utc)));
    }

    let side = match bound {
        Bound::Start => "start",
        Bound::End => "end",
    };
    Err(ApiError::validation(format!("Invalid {side} date format")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let filter = ContentFilter::from_list_query(ListQuery::default()).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset(), 0);
        assert!(filter.category_id.is_none());
        assert!(filter.start_date.is_none());
        assert!(filter.end_date.is_none());
    }

    #[test]
    fn test_page_and_limit_clamped() {
        let filter = ContentFilter::from_list_query(ListQuery {
            page: Some(0),
            limit: Some(-5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_offset_math() {
        let filter = ContentFilter::from_list_query(ListQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.offset(), 20);
    }

    #[test]
    fn test_plain_dates_are_inclusive() {
        let filter = ContentFilter::from_list_query(ListQuery {
            start_date: Some("2026-01-01".into()),
            end_date: Some("2026-01-31".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            filter.start_date.unwrap().to_rfc3339(),
            "2026-01-01T00:00:00+00:00"
        );
        assert_eq!(
            filter.end_date.unwrap().to_rfc3339(),
            "2026-01-31T23:59:59+00:00"
        );
    }

    #[test]
    fn test_rfc3339_dates_accepted() {
        let filter = ContentFilter::from_list_query(ListQuery {
            start_date: Some("2026-02-01T10:30:00Z".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.start_date.is_some());
    }

    #[test]
    fn test_malformed_date_rejected() {
        let result = ContentFilter::from_list_query(ListQuery {
            start_date: Some("not-a-date".into()),
            ..Default::default()
        });
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.public_message().contains("start date"));
    }

    #[test]
    fn test_either_bound_alone_is_allowed() {
        let only_end = ContentFilter::from_list_query(ListQuery {
            end_date: Some("2026-03-01".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(only_end.start_date.is_none());
        assert!(only_end.end_date.is_some());
    }

    #[test]
    fn test_invalid_category_id_rejected() {
        let result = ContentFilter::from_list_query(ListQuery {
            category_id: Some("not-a-uuid".into()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
