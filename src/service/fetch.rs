//! Paginated fetch: one COUNT and one SELECT through an injected database capability.

use crate::error::PaginationError;
use crate::response::PaginatedResponse;
use crate::service::Pagination;
use crate::sql::{build_count_query, build_paginated_query, build_where_and_args, is_valid_query_string, SqlArg};
use async_trait::async_trait;

/// Upper bound on sortable fields per config.
pub const MAX_SORT_FIELDS: usize = 20;

/// Database access the pagination engine needs. Both statements use `$1, $2, ...` placeholders
/// with `args` in placeholder order. Cancellation is by dropping the returned future.
#[async_trait]
pub trait PaginationDb<T: Send + 'static>: Send + Sync {
    /// Single value of the first row (the COUNT result).
    async fn get_scalar(&self, query: &str, args: &[SqlArg]) -> Result<i64, sqlx::Error>;

    async fn select_rows(&self, query: &str, args: &[SqlArg]) -> Result<Vec<T>, sqlx::Error>;
}

/// Run COUNT then SELECT for one request and wrap the rows in the paginated envelope.
///
/// All validation happens before either statement is issued. Both statements share the same
/// WHERE clauses and the same argument list. Database errors are not retried.
pub async fn fetch_paginated<T, D>(
    db: &D,
    base_query: &str,
    count_query: &str,
    pagination: &Pagination<'_>,
) -> Result<PaginatedResponse<T>, PaginationError>
where
    T: Send + 'static,
    D: PaginationDb<T> + ?Sized,
{
    let config = pagination.config;
    if !is_valid_query_string(base_query) || !is_valid_query_string(count_query) {
        return Err(PaginationError::InvalidQueryString);
    }
    if config.allowed_sorts.len() > MAX_SORT_FIELDS {
        return Err(PaginationError::TooManySortFields {
            count: config.allowed_sorts.len(),
            max: MAX_SORT_FIELDS,
        });
    }

    let where_args = build_where_and_args(
        &pagination.filters,
        &config.allowed_filters,
        &config.default_filter,
        &config.allowed_search,
    )?;
    let sort = config
        .allowed_sorts
        .get(&pagination.sort_by)
        .unwrap_or(&config.default_sort);
    let select_sql = build_paginated_query(
        base_query,
        &where_args.clauses,
        sort,
        pagination.order.as_sql(),
        pagination.page_size,
        pagination.offset,
    )?;
    let count_sql = build_count_query(count_query, &where_args.clauses);

    tracing::debug!(sql = %count_sql, args = ?where_args.args, "count query");
    let total = db
        .get_scalar(&count_sql, &where_args.args)
        .await
        .map_err(PaginationError::Count)?;

    tracing::debug!(sql = %select_sql, args = ?where_args.args, "select query");
    let data = db
        .select_rows(&select_sql, &where_args.args)
        .await
        .map_err(PaginationError::Select)?;

    Ok(PaginatedResponse::new(
        data,
        u64::try_from(total).unwrap_or(0),
        pagination.page,
        pagination.page_size,
    ))
}
