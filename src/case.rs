//! Key case conversion at the HTTP edge: query keys camelCase -> snake_case, row keys snake_case -> camelCase.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// "created_at" -> "createdAt"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// "pageSize" -> "page_size". Already-snake keys are unchanged.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn object_keys_to_camel_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let camel = to_camel_case(&k);
        if camel != k {
            if let Some(v) = obj.remove(&k) {
                obj.insert(camel, v);
            }
        }
    }
}

/// Top-level keys only; nested JSON columns are left as stored.
pub fn value_keys_to_camel_case(value: &mut Value) {
    if let Value::Object(ref mut map) = value {
        object_keys_to_camel_case(map);
    }
}

/// Normalize query parameter keys, filter and search keys included. A snake_case key wins over
/// its camelCase spelling. Catalog keys are required to be snake_case so they stay reachable.
pub fn query_keys_to_snake_case(params: HashMap<String, String>) -> HashMap<String, String> {
    let mut out = HashMap::with_capacity(params.len());
    let mut converted = Vec::new();
    for (k, v) in params {
        let snake = to_snake_case(&k);
        if snake == k {
            out.insert(k, v);
        } else {
            converted.push((snake, v));
        }
    }
    for (k, v) in converted {
        out.entry(k).or_insert(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_identifiers() {
        assert_eq!(to_camel_case("created_at"), "createdAt");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_snake_case("pageSize"), "page_size");
        assert_eq!(to_snake_case("sort_by"), "sort_by");
    }

    #[test]
    fn row_keys_become_camel_case() {
        let mut row = serde_json::json!({ "is_active": true, "meta": { "inner_key": 1 } });
        value_keys_to_camel_case(&mut row);
        assert_eq!(row, serde_json::json!({ "isActive": true, "meta": { "inner_key": 1 } }));
    }

    #[test]
    fn camel_case_filter_key_reaches_snake_case_config_key() {
        let params: HashMap<String, String> = [("customerId".to_string(), "42".to_string())].into_iter().collect();
        let out = query_keys_to_snake_case(params);
        assert_eq!(out.get("customer_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn snake_case_query_key_takes_precedence() {
        let params: HashMap<String, String> = [("pageSize", "50"), ("page_size", "10"), ("sortBy", "name")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let out = query_keys_to_snake_case(params);
        assert_eq!(out["page_size"], "10");
        assert_eq!(out["sort_by"], "name");
        assert_eq!(out.len(), 2);
    }
}
