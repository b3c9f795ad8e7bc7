//! Request parameter extraction: page, page_size, sort_by, order and filter values from untrusted
//! query-string input, validated against a `PaginationConfig`.

use crate::config::{DataType, FieldConfig, PaginationConfig};
use crate::error::PaginationError;
use crate::sql::builder::coerce;
use crate::sql::{is_valid_string, SortOrder};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Request-scoped pagination state, built once per request from its query string.
#[derive(Clone, Debug, PartialEq)]
pub struct Pagination<'c> {
    pub page: u32,
    pub page_size: u32,
    pub offset: u64,
    pub sort_by: String,
    pub order: SortOrder,
    pub filters: BTreeMap<String, String>,
    pub config: &'c PaginationConfig,
}

fn parse_bounded(params: &HashMap<String, String>, key: &str, default: u32) -> Result<i64, PaginationError> {
    match params.get(key) {
        None => Ok(default as i64),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| PaginationError::invalid(format!("{} must be an integer", key))),
    }
}

fn validate_filter_value(raw: &str, config: &FieldConfig) -> bool {
    match config.data_type {
        DataType::String => is_valid_string(raw),
        data_type => coerce(data_type, config.effective_operator(), raw).is_ok(),
    }
}

impl<'c> Pagination<'c> {
    /// Build from raw query parameters.
    ///
    /// Non-numeric `page`/`page_size`, unknown `sort_by` and malformed filter values are errors.
    /// Out-of-range page numbers are clamped, and an unrecognized `order` falls back to DESC.
    pub fn from_query(params: &HashMap<String, String>, config: &'c PaginationConfig) -> Result<Self, PaginationError> {
        let page = parse_bounded(params, "page", DEFAULT_PAGE)?;
        let page_size = parse_bounded(params, "page_size", DEFAULT_PAGE_SIZE)?;

        let page = if page < 1 { DEFAULT_PAGE } else { u32::try_from(page).unwrap_or(u32::MAX) };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else if page_size > MAX_PAGE_SIZE as i64 {
            MAX_PAGE_SIZE
        } else {
            page_size as u32
        };

        let order = params
            .get("order")
            .map(|o| SortOrder::parse_or(o, SortOrder::Desc))
            .unwrap_or(SortOrder::Desc);

        let mut filters = BTreeMap::new();
        for key in config.allowed_search.keys() {
            let Some(val) = params.get(key).filter(|v| !v.is_empty()) else { continue };
            if !is_valid_string(val) {
                tracing::debug!(filter = %key, "rejected search value");
                return Err(PaginationError::invalid(format!("invalid filter value for field {}", key)));
            }
            filters.insert(key.clone(), val.clone());
        }

        for (key, field) in &config.allowed_filters {
            match params.get(key).filter(|v| !v.is_empty()) {
                Some(val) => {
                    if !validate_filter_value(val, field) {
                        tracing::debug!(filter = %key, "rejected filter value");
                        return Err(PaginationError::invalid(format!("invalid filter value for field {}", key)));
                    }
                    filters.insert(key.clone(), val.clone());
                }
                None if field.required => {
                    filters.insert(key.clone(), String::new());
                }
                None => {}
            }
        }

        let sort_by = match params.get("sort_by").filter(|s| !s.is_empty()) {
            Some(s) if config.allowed_sorts.contains_key(s) => s.clone(),
            Some(s) => {
                tracing::debug!(sort_by = %s, "rejected sort field");
                return Err(PaginationError::invalid(format!("invalid sort field {}", s)));
            }
            None => config.default_sort.field.clone(),
        };

        Ok(Pagination {
            page,
            page_size,
            offset: (page as u64 - 1) * page_size as u64,
            sort_by,
            order,
            filters,
            config,
        })
    }
}
