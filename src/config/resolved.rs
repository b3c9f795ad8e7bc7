//! Resource catalog: validated resource definitions keyed by path segment for runtime lookup.

use crate::config::PaginationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One listable resource as written in the catalog file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// URL segment under `/api/v1/` (e.g. "assessments").
    pub path_segment: String,
    /// SELECT without WHERE/ORDER/LIMIT; those are appended per request.
    pub base_query: String,
    /// COUNT statement over the same FROM/JOIN as `base_query`.
    pub count_query: String,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceCatalog {
    resources: Vec<ResourceConfig>,
    by_path: HashMap<String, usize>,
}

impl ResourceCatalog {
    /// Index resources by path segment. Call after `validate_resources`.
    pub(crate) fn new(resources: Vec<ResourceConfig>) -> Self {
        let by_path = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.path_segment.clone(), i))
            .collect();
        ResourceCatalog { resources, by_path }
    }

    pub fn resource_by_path(&self, path: &str) -> Option<&ResourceConfig> {
        self.by_path.get(path).and_then(|&i| self.resources.get(i))
    }

    pub fn resources(&self) -> &[ResourceConfig] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(path: &str) -> ResourceConfig {
        ResourceConfig {
            path_segment: path.to_string(),
            base_query: format!("SELECT id FROM {}", path),
            count_query: format!("SELECT COUNT(*) FROM {}", path),
            pagination: PaginationConfig::default(),
        }
    }

    #[test]
    fn lookup_by_path_segment() {
        let catalog = ResourceCatalog::new(vec![resource("users"), resource("roles")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resource_by_path("roles").map(|r| r.base_query.as_str()), Some("SELECT id FROM roles"));
        assert!(catalog.resource_by_path("teams").is_none());
        assert_eq!(catalog.resources()[0].path_segment, "users");
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let catalog = ResourceCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.resource_by_path("users").is_none());
    }
}
