//! Resource list routes. The path segment selects the catalog entry at request time.

use crate::handlers::resource::list;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/:path_segment", get(list))
        .with_state(state)
}
