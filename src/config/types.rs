//! Pagination config model: which fields may be filtered, sorted and searched.
//!
//! All maps are ordered so that clause generation walks keys lexicographically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a raw query-string value is coerced before it is bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    String,
    Uuid,
    Boolean,
    Number,
    Date,
    InYear,
}

impl DataType {
    /// Operator used when a field has no explicit override.
    pub fn default_operator(self) -> Operator {
        match self {
            DataType::String => Operator::ILike,
            _ => Operator::Eq,
        }
    }
}

/// Comparison operators a filter may be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>", alias = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE", alias = "like")]
    Like,
    #[serde(rename = "ILIKE", alias = "ilike")]
    ILike,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::ILike => "ILIKE",
        }
    }

    pub fn is_pattern(self) -> bool {
        matches!(self, Operator::Like | Operator::ILike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One filterable column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub field: String,
    #[serde(default)]
    pub table_alias: Option<String>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub operator: Option<Operator>,
    /// SQL functions applied innermost-first.
    #[serde(default)]
    pub transform: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl FieldConfig {
    pub fn new(field: impl Into<String>) -> Self {
        FieldConfig {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn transform(mut self, function: impl Into<String>) -> Self {
        self.transform.push(function.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn effective_operator(&self) -> Operator {
        self.operator.unwrap_or_else(|| self.data_type.default_operator())
    }
}

/// One sortable column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    #[serde(default)]
    pub table_alias: Option<String>,
    #[serde(default)]
    pub transform: Vec<String>,
    #[serde(default)]
    pub nulls_last: bool,
}

impl SortConfig {
    pub fn new(field: impl Into<String>) -> Self {
        SortConfig {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn transform(mut self, function: impl Into<String>) -> Self {
        self.transform.push(function.into());
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }
}

/// Composite search key: one term matched with ILIKE across several columns, OR-joined.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub fields: Vec<FieldConfig>,
}

impl SearchConfig {
    pub fn new(fields: impl IntoIterator<Item = FieldConfig>) -> Self {
        SearchConfig {
            fields: fields.into_iter().collect(),
        }
    }
}

/// Server-side filter applied regardless of client input (tenant scoping, soft deletes).
/// Unset operator/transform fall back to the field's `FieldConfig`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultFilterField {
    pub value: String,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub transform: Vec<String>,
}

impl DefaultFilterField {
    pub fn new(value: impl Into<String>) -> Self {
        DefaultFilterField {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn transform(mut self, function: impl Into<String>) -> Self {
        self.transform.push(function.into());
        self
    }
}

fn default_sort() -> SortConfig {
    SortConfig::new("id")
}

fn default_allowed_sorts() -> BTreeMap<String, SortConfig> {
    BTreeMap::from([("id".to_string(), default_sort())])
}

/// Read-only template shared across requests; each request gets its own `Pagination`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default)]
    pub allowed_filters: BTreeMap<String, FieldConfig>,
    #[serde(default = "default_allowed_sorts")]
    pub allowed_sorts: BTreeMap<String, SortConfig>,
    #[serde(default)]
    pub allowed_search: BTreeMap<String, SearchConfig>,
    #[serde(default = "default_sort")]
    pub default_sort: SortConfig,
    #[serde(default)]
    pub default_filter: BTreeMap<String, DefaultFilterField>,
}

impl Default for PaginationConfig {
    /// Sortable by `id` only, sorted by `id` by default.
    fn default() -> Self {
        PaginationConfig {
            allowed_filters: BTreeMap::new(),
            allowed_sorts: default_allowed_sorts(),
            allowed_search: BTreeMap::new(),
            default_sort: default_sort(),
            default_filter: BTreeMap::new(),
        }
    }
}

impl PaginationConfig {
    pub fn with_filter(mut self, key: impl Into<String>, config: FieldConfig) -> Self {
        self.allowed_filters.insert(key.into(), config);
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, config: SortConfig) -> Self {
        self.allowed_sorts.insert(key.into(), config);
        self
    }

    pub fn with_search(mut self, key: impl Into<String>, config: SearchConfig) -> Self {
        self.allowed_search.insert(key.into(), config);
        self
    }

    /// Sets the fallback sort. The sort is also registered under its field name so `sort_by` can name it.
    pub fn with_default_sort(mut self, config: SortConfig) -> Self {
        self.allowed_sorts
            .entry(config.field.clone())
            .or_insert_with(|| config.clone());
        self.default_sort = config;
        self
    }

    pub fn with_default_filter(mut self, key: impl Into<String>, filter: DefaultFilterField) -> Self {
        self.default_filter.insert(key.into(), filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sorts_by_id() {
        let config = PaginationConfig::default();
        assert_eq!(config.default_sort.field, "id");
        assert!(config.allowed_sorts.contains_key("id"));
        assert!(config.allowed_filters.is_empty());
        assert!(config.default_filter.is_empty());
    }

    #[test]
    fn builder_registers_entries() {
        let config = PaginationConfig::default()
            .with_filter(
                "name",
                FieldConfig::new("name").table_alias("u").operator(Operator::Like),
            )
            .with_sort("created_at", SortConfig::new("created_at").nulls_last())
            .with_default_sort(SortConfig::new("updated_at"));

        let name = &config.allowed_filters["name"];
        assert_eq!(name.table_alias.as_deref(), Some("u"));
        assert_eq!(name.effective_operator(), Operator::Like);
        assert!(config.allowed_sorts["created_at"].nulls_last);
        assert_eq!(config.default_sort.field, "updated_at");
        assert!(config.allowed_sorts.contains_key("updated_at"));
    }

    #[test]
    fn operator_defaults_follow_data_type() {
        assert_eq!(FieldConfig::new("name").effective_operator(), Operator::ILike);
        assert_eq!(
            FieldConfig::new("age").data_type(DataType::Number).effective_operator(),
            Operator::Eq
        );
    }

    #[test]
    fn deserializes_from_catalog_json() {
        let config: PaginationConfig = serde_json::from_value(serde_json::json!({
            "allowed_filters": {
                "year": { "field": "created_at", "data_type": "in_year" },
                "age": { "field": "age", "data_type": "number", "operator": ">=" },
                "status": { "field": "status", "operator": "!=" }
            },
            "default_filter": { "deleted_at": { "value": "" } }
        }))
        .unwrap();
        assert_eq!(config.allowed_filters["year"].data_type, DataType::InYear);
        assert_eq!(config.allowed_filters["age"].operator, Some(Operator::Gte));
        assert_eq!(config.allowed_filters["status"].operator, Some(Operator::Ne));
        assert_eq!(config.default_sort.field, "id");
        assert_eq!(config.default_filter["deleted_at"].value, "");
    }
}
