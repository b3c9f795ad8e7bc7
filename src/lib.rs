//! Listing SDK: configuration-driven, injection-safe paginated listing over PostgreSQL.

pub mod case;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use config::{
    load_catalog_from_path, load_catalog_from_str, DataType, DefaultFilterField, FieldConfig, Operator,
    PaginationConfig, ResourceCatalog, ResourceConfig, SearchConfig, Settings, SortConfig,
};
pub use error::{AppError, ConfigError, PaginationError};
pub use response::{error_body, PaginatedResponse};
pub use routes::{app, common_routes, resource_routes};
pub use service::{fetch_paginated, JsonRow, Pagination, PaginationDb, PgExecutor};
pub use sql::{build_field_expression, build_where_and_args, SortOrder, SqlArg};
pub use state::AppState;
