//! Response envelopes.

use serde::Serialize;

/// One page of results plus totals. Serialized with camelCase keys
/// (`data`, `total`, `page`, `pageSize`, `totalPages`).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// `total_pages` is `ceil(total / page_size)`, or 0 when either is 0.
    pub fn new(data: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if total == 0 || page_size == 0 {
            0
        } else {
            total.div_ceil(page_size as u64)
        };
        PaginatedResponse {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// Transform each row, keeping the totals.
    pub fn map_data<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

pub fn error_body(code: &str, message: String, details: Option<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 23, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(PaginatedResponse::<u8>::new(vec![], 20, 1, 10).total_pages, 2);
    }

    #[test]
    fn zero_total_means_zero_pages() {
        let page = PaginatedResponse::<u8>::new(vec![], 0, 1, 20);
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn serializes_camel_case_envelope() {
        let page = PaginatedResponse::new(vec!["a"], 1, 1, 20);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": ["a"], "total": 1, "page": 1, "pageSize": 20, "totalPages": 1 })
        );
    }

    #[test]
    fn map_data_keeps_totals() {
        let page = PaginatedResponse::new(vec![1, 2], 12, 2, 2).map_data(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.total_pages, 6);
    }
}
