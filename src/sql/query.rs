//! Final statement assembly: WHERE, ORDER BY and LIMIT/OFFSET appended to a caller's base SELECT.

use crate::config::SortConfig;
use crate::error::PaginationError;
use crate::sql::builder::{build_field_expression, where_sql};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive `ASC` / `DESC`; anything else yields `fallback`.
    pub fn parse_or(s: &str, fallback: SortOrder) -> SortOrder {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            fallback
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Base query + ` WHERE ...` + ` ORDER BY expr dir [NULLS LAST]` + ` LIMIT n OFFSET m`.
///
/// `order` other than ASC/DESC (any case) becomes ASC. Limit and offset are integers and
/// are written literally.
pub fn build_paginated_query(
    base_query: &str,
    where_clauses: &[String],
    sort: &SortConfig,
    order: &str,
    limit: u32,
    offset: u64,
) -> Result<String, PaginationError> {
    let sort_expr = build_field_expression(&sort.field, sort.table_alias.as_deref(), &sort.transform)?;
    let order = SortOrder::parse_or(order, SortOrder::Asc);
    let nulls = if sort.nulls_last { " NULLS LAST" } else { "" };
    Ok(format!(
        "{}{} ORDER BY {} {}{} LIMIT {} OFFSET {}",
        base_query,
        where_sql(where_clauses),
        sort_expr,
        order,
        nulls,
        limit,
        offset
    ))
}

/// Count statement: base count query + the same WHERE clauses, no ordering or paging.
pub fn build_count_query(count_query: &str, where_clauses: &[String]) -> String {
    format!("{}{}", count_query, where_sql(where_clauses))
}
