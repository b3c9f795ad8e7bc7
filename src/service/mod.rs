//! Pagination service: request parsing, the fetch pipeline and its PostgreSQL executor.

mod executor;
mod fetch;
mod request;

pub use executor::{JsonRow, PgExecutor};
pub use fetch::{fetch_paginated, PaginationDb, MAX_SORT_FIELDS};
pub use request::{Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
