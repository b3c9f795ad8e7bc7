//! Builds WHERE predicates and their positional arguments from whitelisted filter config.

use crate::config::{DataType, DefaultFilterField, FieldConfig, Operator, SearchConfig};
use crate::error::PaginationError;
use crate::sql::identifier::{is_valid_field_name, is_valid_transform_function};
use crate::sql::params::SqlArg;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

/// Upper bound on filter entries (search keys included) per request.
pub const MAX_FILTERS: usize = 20;

/// Predicates to be AND-joined, plus the arguments their `$n` placeholders refer to.
/// Placeholder `$n` always refers to `args[n - 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterClauses {
    pub clauses: Vec<String>,
    pub args: Vec<SqlArg>,
}

impl FilterClauses {
    fn push_arg(&mut self, arg: SqlArg) -> usize {
        self.args.push(arg);
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// ` WHERE c1 AND c2 ...`, or empty when there are no clauses.
    pub fn where_sql(&self) -> String {
        where_sql(&self.clauses)
    }
}

pub(crate) fn where_sql(clauses: &[String]) -> String {
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// `[alias.]field`, wrapped by each transform in order (first transform is innermost).
pub fn build_field_expression(
    field: &str,
    table_alias: Option<&str>,
    transform: &[String],
) -> Result<String, PaginationError> {
    if !is_valid_field_name(field) {
        return Err(PaginationError::invalid(format!("invalid field name {:?}", field)));
    }
    let mut expression = match table_alias.filter(|a| !a.is_empty()) {
        Some(alias) => {
            if !is_valid_field_name(alias) {
                return Err(PaginationError::invalid(format!("invalid table alias {:?}", alias)));
            }
            format!("{}.{}", alias, field)
        }
        None => field.to_string(),
    };
    for function in transform {
        if !is_valid_transform_function(function) {
            return Err(PaginationError::invalid(format!("invalid transform function {:?}", function)));
        }
        expression = format!("{}({})", function.to_ascii_uppercase(), expression);
    }
    Ok(expression)
}

/// Coerced right-hand side of a predicate.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Bound {
    /// `expr IS NULL`, no argument.
    Null,
    /// No predicate at all.
    Absent,
    Arg(SqlArg),
}

/// Escape LIKE metacharacters so user text matches literally.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}

/// Coerce a raw value by data type. An empty uuid means NULL; an empty boolean, number,
/// date or year adds no predicate.
pub(crate) fn coerce(data_type: DataType, operator: Operator, raw: &str) -> Result<Bound, &'static str> {
    if raw.is_empty() {
        match data_type {
            DataType::String => {}
            DataType::Uuid => return Ok(Bound::Null),
            _ => return Ok(Bound::Absent),
        }
    }
    let arg = match data_type {
        DataType::String => {
            if operator.is_pattern() {
                SqlArg::Text(contains_pattern(raw))
            } else {
                SqlArg::Text(raw.to_string())
            }
        }
        DataType::Uuid => SqlArg::Uuid(uuid::Uuid::parse_str(raw).map_err(|_| "invalid uuid")?),
        DataType::Boolean => match raw {
            "true" => SqlArg::Bool(true),
            "false" => SqlArg::Bool(false),
            _ => return Err("invalid boolean"),
        },
        DataType::Number => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => SqlArg::Float(n),
            _ => return Err("invalid number"),
        },
        DataType::Date => {
            let parsed = DateTime::parse_from_rfc3339(raw).map_err(|_| "invalid RFC 3339 date")?;
            SqlArg::Timestamp(parsed.with_timezone(&Utc))
        }
        DataType::InYear => match raw.parse::<i64>() {
            Ok(year) if (1..=9999).contains(&year) => SqlArg::Int(year),
            _ => return Err("invalid year"),
        },
    };
    Ok(Bound::Arg(arg))
}

fn push_filter(
    out: &mut FilterClauses,
    key: &str,
    config: &FieldConfig,
    operator: Operator,
    transform: &[String],
    raw: &str,
) -> Result<(), PaginationError> {
    let column = build_field_expression(&config.field, config.table_alias.as_deref(), transform)?;
    let expr = match config.data_type {
        DataType::InYear => format!("EXTRACT(YEAR FROM {})", column),
        _ => column,
    };
    let bound = coerce(config.data_type, operator, raw)
        .map_err(|reason| PaginationError::invalid(format!("{} for filter {}", reason, key)))?;
    match bound {
        Bound::Null => out.clauses.push(format!("{} IS NULL", expr)),
        Bound::Absent => {}
        Bound::Arg(arg) => {
            let n = out.push_arg(arg);
            out.clauses.push(format!("{} {} ${}", expr, operator, n));
        }
    }
    Ok(())
}

/// Turn request filters, search terms and server default filters into predicates.
///
/// Order is fixed: search keys, then plain filters, then default filters, each in key order.
/// Filter keys without a config entry are ignored; only whitelisted fields produce SQL.
pub fn build_where_and_args(
    filters: &BTreeMap<String, String>,
    field_configs: &BTreeMap<String, FieldConfig>,
    default_filters: &BTreeMap<String, DefaultFilterField>,
    search_configs: &BTreeMap<String, SearchConfig>,
) -> Result<FilterClauses, PaginationError> {
    if filters.len() > MAX_FILTERS {
        return Err(PaginationError::TooManyFilters {
            count: filters.len(),
            max: MAX_FILTERS,
        });
    }

    let mut out = FilterClauses::default();
    let mut consumed: HashSet<&str> = HashSet::new();

    for (key, search) in search_configs {
        let Some(term) = filters.get(key).filter(|t| !t.is_empty()) else { continue };
        if search.fields.is_empty() {
            continue;
        }
        let mut parts = Vec::with_capacity(search.fields.len());
        for target in &search.fields {
            let expr = build_field_expression(&target.field, target.table_alias.as_deref(), &target.transform)?;
            let n = out.push_arg(SqlArg::Text(contains_pattern(term)));
            parts.push(format!("{} ILIKE ${}", expr, n));
        }
        out.clauses.push(format!("({})", parts.join(" OR ")));
        consumed.insert(key.as_str());
    }

    for (key, raw) in filters {
        if consumed.contains(key.as_str()) {
            continue;
        }
        let Some(config) = field_configs.get(key) else { continue };
        push_filter(&mut out, key, config, config.effective_operator(), &config.transform, raw)?;
    }

    for (key, default) in default_filters {
        let Some(config) = field_configs.get(key) else {
            tracing::warn!(filter = %key, "default filter has no field config; skipped");
            continue;
        };
        let transform = if default.transform.is_empty() {
            &config.transform
        } else {
            &default.transform
        };
        let operator = default.operator.unwrap_or_else(|| config.effective_operator());
        push_filter(&mut out, key, config, operator, transform, &default.value)?;
    }

    Ok(out)
}
