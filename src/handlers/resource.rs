//! Resource list handler: resolve the catalog entry, parse pagination, run the fetch.

use crate::case::{query_keys_to_snake_case, value_keys_to_camel_case};
use crate::error::AppError;
use crate::response::PaginatedResponse;
use crate::service::{fetch_paginated, JsonRow, Pagination};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PaginatedResponse<Value>>, AppError> {
    let resource = state
        .catalog
        .resource_by_path(&path_segment)
        .ok_or_else(|| AppError::NotFound(path_segment.clone()))?;
    let params = query_keys_to_snake_case(params);
    let pagination = Pagination::from_query(&params, &resource.pagination)?;
    tracing::debug!(
        resource = %path_segment,
        page = pagination.page,
        page_size = pagination.page_size,
        filters = pagination.filters.len(),
        "list"
    );
    let page = fetch_paginated::<JsonRow, _>(&state.db, &resource.base_query, &resource.count_query, &pagination).await?;
    Ok(Json(page.map_data(|row| {
        let mut value = row.into_inner();
        value_keys_to_camel_case(&mut value);
        value
    })))
}
