//! Page-based pagination for list endpoints.
//!
//! Lists accept `page` (1-indexed, default 1) and `limit` (1-100, default 10)
//! and answer with the [`Paginated`] envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "count": 10,
//!   "total": 42,
//!   "page": 2,
//!   "pages": 5,
//!   "data": [...]
//! }
//! ```
//!
//! A page past the end is not an error: `data` is empty while `total` and
//! `pages` still describe the whole collection.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query strings deliver numbers as text; an empty value counts as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Number of pages needed to hold `total` items, `ceil(total / limit)`.
#[must_use]
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub success: bool,
    /// Items on this page
    pub count: usize,
    /// Items across all pages
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        Self {
            success: true,
            count: data.len(),
            total,
            page: params.page(),
            pages: total_pages(total, params.limit()),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_from_page() {
        let params = PaginationParams::new(3, 20);
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_limit_boundary_cases() {
        let cases = vec![
            (Some(1), 1),
            (Some(50), 50),
            (Some(100), 100),
            (Some(101), 100),
            (Some(0), 1),
            (Some(-1), 1),
            (None, 10),
        ];

        for (input, expected) in cases {
            let params = PaginationParams {
                page: None,
                limit: input,
            };
            assert_eq!(params.limit(), expected, "limit {input:?}");
        }
    }

    #[test]
    fn test_page_clamped_to_one() {
        let params = PaginationParams {
            page: Some(-4),
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(42, 5), 9);
    }

    #[test]
    fn test_paginated_envelope() {
        let params = PaginationParams::new(2, 2);
        let page = Paginated::new(vec!["c", "d"], 5, &params);

        assert!(page.success);
        assert_eq!(page.count, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn test_paginated_beyond_end_is_empty() {
        let params = PaginationParams::new(9, 10);
        let page: Paginated<i32> = Paginated::new(vec![], 12, &params);

        assert_eq!(page.count, 0);
        assert_eq!(page.total, 12);
        assert_eq!(page.pages, 2);
        assert_eq!(page.page, 9);
    }

    #[test]
    fn test_paginated_serializes_envelope_keys() {
        let page = Paginated::new(vec![1, 2], 2, &PaginationParams::default());
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 2);
        assert_eq!(value["total"], 2);
        assert_eq!(value["page"], 1);
        assert_eq!(value["pages"], 1);
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_deserialize_from_strings() {
        let json = r#"{"page":"3","limit":"25"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let json = r#"{"page":"","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_deserialize_non_numeric_fails() {
        let json = r#"{"page":"abc"}"#;
        assert!(serde_json::from_str::<PaginationParams>(json).is_err());
    }
}
