// ABOUTME: Shared API response types
// ABOUTME: Success envelope plus optional pagination for admin listings

use serde::{Deserialize, Serialize};
use storefront_core::{PaginatedResponse, PaginationParams};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// `?page=&limit=` on admin list endpoints. Both absent means "everything".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn params(&self) -> Option<PaginationParams> {
        if self.page.is_none() && self.limit.is_none() {
            return None;
        }

        let defaults = PaginationParams::default();
        Some(PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        ))
    }
}

/// A full listing or one page of it
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    All(Vec<T>),
    Page(PaginatedResponse<T>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_omits_error() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_page_query() {
        assert!(PageQuery::default().params().is_none());

        let params = PageQuery {
            page: Some(3),
            limit: None,
        }
        .params()
        .unwrap();
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 20);
    }
}
