//! Load the resource catalog from a JSON file or string.

use crate::config::{validate_resources, ResourceCatalog, ResourceConfig};
use crate::error::ConfigError;
use std::path::Path;

/// Build the catalog from parsed resources (validates first).
pub fn resolve(resources: Vec<ResourceConfig>) -> Result<ResourceCatalog, ConfigError> {
    validate_resources(&resources)?;
    Ok(ResourceCatalog::new(resources))
}

/// Parse a JSON array of resources and validate it.
pub fn load_catalog_from_str(json: &str) -> Result<ResourceCatalog, ConfigError> {
    let resources: Vec<ResourceConfig> =
        serde_json::from_str(json).map_err(|e| ConfigError::Load(format!("catalog json: {}", e)))?;
    resolve(resources)
}

pub async fn load_catalog_from_path(path: impl AsRef<Path>) -> Result<ResourceCatalog, ConfigError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let catalog = load_catalog_from_str(&json)?;
    tracing::info!(path = %path.display(), resources = catalog.len(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataType;

    const CATALOG: &str = r#"[
        {
            "path_segment": "assessments",
            "base_query": "SELECT a.id, a.name, a.code FROM assessments a",
            "count_query": "SELECT COUNT(*) FROM assessments a",
            "pagination": {
                "allowed_filters": {
                    "is_active": { "field": "is_active", "table_alias": "a", "data_type": "boolean" }
                },
                "allowed_sorts": { "name": { "field": "name", "table_alias": "a" } },
                "default_sort": { "field": "name", "table_alias": "a" }
            }
        },
        {
            "path_segment": "modules",
            "base_query": "SELECT id, name FROM modules",
            "count_query": "SELECT COUNT(*) FROM modules"
        }
    ]"#;

    #[test]
    fn loads_and_indexes_resources() {
        let catalog = load_catalog_from_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        let assessments = catalog.resource_by_path("assessments").unwrap();
        assert_eq!(
            assessments.pagination.allowed_filters["is_active"].data_type,
            DataType::Boolean
        );
        let modules = catalog.resource_by_path("modules").unwrap();
        assert_eq!(modules.pagination.default_sort.field, "id");
        assert!(catalog.resource_by_path("users").is_none());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(load_catalog_from_str("{"), Err(ConfigError::Load(_))));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let err = load_catalog_from_path("/nonexistent/catalog.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
