//! Catalog validation: every identifier, statement and default filter is checked before serving.

use crate::case::to_snake_case;
use crate::config::{FieldConfig, PaginationConfig, ResourceConfig, SortConfig};
use crate::error::ConfigError;
use crate::service::MAX_SORT_FIELDS;
use crate::sql::builder::{coerce, Bound};
use crate::sql::{build_field_expression, is_valid_field_name, is_valid_query_string};
use std::collections::HashSet;

fn invalid_identifier(resource: &str, identifier: impl Into<String>) -> ConfigError {
    ConfigError::InvalidIdentifier {
        resource: resource.to_string(),
        identifier: identifier.into(),
    }
}

fn check_field(resource: &str, key: &str, config: &FieldConfig, transform: &[String]) -> Result<(), ConfigError> {
    build_field_expression(&config.field, config.table_alias.as_deref(), transform)
        .map(|_| ())
        .map_err(|e| invalid_identifier(resource, format!("{}: {}", key, e)))
}

fn check_sort(resource: &str, key: &str, sort: &SortConfig) -> Result<(), ConfigError> {
    build_field_expression(&sort.field, sort.table_alias.as_deref(), &sort.transform)
        .map(|_| ())
        .map_err(|e| invalid_identifier(resource, format!("sort {}: {}", key, e)))
}

// Request keys are normalized to snake_case before lookup, so a camelCase key could never match.
fn check_request_key(resource: &str, key: &str) -> Result<(), ConfigError> {
    if to_snake_case(key) != key {
        return Err(ConfigError::Validation(format!(
            "{}: request key '{}' must be snake_case",
            resource, key
        )));
    }
    Ok(())
}

pub fn validate_pagination(resource: &str, config: &PaginationConfig) -> Result<(), ConfigError> {
    for key in config.allowed_filters.keys().chain(config.allowed_search.keys()) {
        check_request_key(resource, key)?;
    }
    for (key, field) in &config.allowed_filters {
        check_field(resource, key, field, &field.transform)?;
    }
    for (key, search) in &config.allowed_search {
        if search.fields.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{}: search key '{}' has no fields",
                resource, key
            )));
        }
        for target in &search.fields {
            check_field(resource, key, target, &target.transform)?;
        }
    }
    if config.allowed_sorts.len() > MAX_SORT_FIELDS {
        return Err(ConfigError::Validation(format!(
            "{}: {} sort fields exceed the limit of {}",
            resource,
            config.allowed_sorts.len(),
            MAX_SORT_FIELDS
        )));
    }
    for (key, sort) in &config.allowed_sorts {
        check_sort(resource, key, sort)?;
    }
    check_sort(resource, "default", &config.default_sort)?;

    for (key, default) in &config.default_filter {
        let field = config.allowed_filters.get(key).ok_or_else(|| {
            ConfigError::Validation(format!(
                "{}: default filter '{}' has no allowed filter entry",
                resource, key
            ))
        })?;
        let transform = if default.transform.is_empty() {
            &field.transform
        } else {
            &default.transform
        };
        check_field(resource, key, field, transform)?;
        let operator = default.operator.unwrap_or_else(|| field.effective_operator());
        let bound = coerce(field.data_type, operator, &default.value).map_err(|reason| {
            ConfigError::Validation(format!("{}: default filter '{}': {}", resource, key, reason))
        })?;
        if bound == Bound::Absent {
            return Err(ConfigError::Validation(format!(
                "{}: default filter '{}' has an empty value and would never apply",
                resource, key
            )));
        }
    }
    Ok(())
}

pub fn validate_resources(resources: &[ResourceConfig]) -> Result<(), ConfigError> {
    let mut path_segments = HashSet::new();
    for r in resources {
        if !is_valid_field_name(&r.path_segment) {
            return Err(invalid_identifier(&r.path_segment, "path_segment"));
        }
        if !path_segments.insert(r.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(r.path_segment.clone()));
        }
        if !is_valid_query_string(&r.base_query) || !is_valid_query_string(&r.count_query) {
            return Err(ConfigError::Validation(format!(
                "{}: base_query and count_query must each be a single SELECT",
                r.path_segment
            )));
        }
        validate_pagination(&r.path_segment, &r.pagination)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataType, DefaultFilterField, SearchConfig};

    fn resource(path: &str, pagination: PaginationConfig) -> ResourceConfig {
        ResourceConfig {
            path_segment: path.to_string(),
            base_query: "SELECT id, name FROM users".into(),
            count_query: "SELECT COUNT(*) FROM users".into(),
            pagination,
        }
    }

    #[test]
    fn accepts_well_formed_catalog() {
        let pagination = PaginationConfig::default()
            .with_filter("name", FieldConfig::new("name").transform("LOWER"))
            .with_filter("tenant_id", FieldConfig::new("tenant_id").data_type(DataType::Uuid))
            .with_search("q", SearchConfig::new([FieldConfig::new("name")]))
            .with_default_filter(
                "tenant_id",
                DefaultFilterField::new("550e8400-e29b-41d4-a716-446655440000"),
            );
        validate_resources(&[resource("users", pagination), resource("roles", PaginationConfig::default())])
            .unwrap();
    }

    #[test]
    fn rejects_injected_field_name() {
        let pagination =
            PaginationConfig::default().with_filter("name", FieldConfig::new("name; DROP TABLE users;"));
        let err = validate_resources(&[resource("users", pagination)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    fn rejects_unknown_transform_in_sort() {
        let pagination = PaginationConfig::default().with_sort("name", SortConfig::new("name").transform("MD5"));
        let err = validate_resources(&[resource("users", pagination)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    fn rejects_duplicate_path_segments() {
        let err = validate_resources(&[
            resource("users", PaginationConfig::default()),
            resource("users", PaginationConfig::default()),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePathSegment(p) if p == "users"));
    }

    #[test]
    fn rejects_multi_statement_queries() {
        let mut r = resource("users", PaginationConfig::default());
        r.count_query = "SELECT COUNT(*) FROM users; DELETE FROM users".into();
        assert!(matches!(validate_resources(&[r]), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_orphan_or_invalid_default_filter() {
        let orphan = PaginationConfig::default().with_default_filter("deleted_at", DefaultFilterField::new(""));
        assert!(matches!(
            validate_resources(&[resource("users", orphan)]),
            Err(ConfigError::Validation(_))
        ));

        let empty_number = PaginationConfig::default()
            .with_filter("min_score", FieldConfig::new("score").data_type(DataType::Number))
            .with_default_filter("min_score", DefaultFilterField::new(""));
        assert!(matches!(
            validate_resources(&[resource("users", empty_number)]),
            Err(ConfigError::Validation(_))
        ));

        let bad_value = PaginationConfig::default()
            .with_filter("active", FieldConfig::new("active").data_type(DataType::Boolean))
            .with_default_filter("active", DefaultFilterField::new("yes"));
        assert!(matches!(
            validate_resources(&[resource("users", bad_value)]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_camel_case_request_keys() {
        let filter = PaginationConfig::default().with_filter("customerId", FieldConfig::new("customer_id"));
        assert!(matches!(
            validate_resources(&[resource("users", filter)]),
            Err(ConfigError::Validation(_))
        ));

        let search = PaginationConfig::default().with_search("fullText", SearchConfig::new([FieldConfig::new("name")]));
        assert!(matches!(
            validate_resources(&[resource("users", search)]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_too_many_sorts() {
        let mut pagination = PaginationConfig::default();
        for i in 0..MAX_SORT_FIELDS {
            pagination = pagination.with_sort(format!("f{}", i), SortConfig::new(format!("f{}", i)));
        }
        assert!(matches!(
            validate_resources(&[resource("users", pagination)]),
            Err(ConfigError::Validation(_))
        ));
    }
}
