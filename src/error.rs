//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("invalid identifier in resource '{resource}': {identifier}")]
    InvalidIdentifier { resource: String, identifier: String },
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),
}

/// Failures of the query construction and pagination engine.
///
/// Everything except `Count` and `Select` is detected before any SQL runs.
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("invalid pagination parameter: {0}")]
    InvalidParam(String),
    #[error("too many filters: {count} (max {max})")]
    TooManyFilters { count: usize, max: usize },
    #[error("too many sort fields: {count} (max {max})")]
    TooManySortFields { count: usize, max: usize },
    #[error("invalid query string")]
    InvalidQueryString,
    #[error("error getting total count: {0}")]
    Count(#[source] sqlx::Error),
    #[error("error fetching data: {0}")]
    Select(#[source] sqlx::Error),
}

impl PaginationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PaginationError::InvalidParam(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Pagination(e) => match e {
                PaginationError::InvalidParam(_) => (StatusCode::BAD_REQUEST, "invalid_pagination_param"),
                PaginationError::TooManyFilters { .. } => (StatusCode::BAD_REQUEST, "too_many_filters"),
                PaginationError::TooManySortFields { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "too_many_sort_fields")
                }
                PaginationError::InvalidQueryString => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_query_string"),
                PaginationError::Count(_) | PaginationError::Select(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let err = AppError::from(PaginationError::invalid("page"));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "invalid_pagination_param"));

        let err = AppError::from(PaginationError::TooManyFilters { count: 21, max: 20 });
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn misconfiguration_and_database_errors_map_to_server_error() {
        let err = AppError::from(PaginationError::InvalidQueryString);
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::from(PaginationError::Count(sqlx::Error::Protocol("gone".into())));
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "database_error"));
    }

    #[test]
    fn unknown_resource_maps_to_not_found() {
        let err = AppError::NotFound("users".into());
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "not_found"));
    }

    #[test]
    fn database_step_is_kept_in_message() {
        let err = PaginationError::Select(sqlx::Error::Protocol("gone".into()));
        assert!(err.to_string().starts_with("error fetching data"));
        let err = PaginationError::Count(sqlx::Error::Protocol("gone".into()));
        assert!(err.to_string().starts_with("error getting total count"));
    }
}
