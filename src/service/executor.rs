//! PostgreSQL implementation of `PaginationDb` and a dynamic JSON row type.

use crate::service::PaginationDb;
use crate::sql::SqlArg;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// Runs pagination statements on a pool.
#[derive(Clone, Debug)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        PgExecutor { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl<T> PaginationDb<T> for PgExecutor
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    async fn get_scalar(&self, query: &str, args: &[SqlArg]) -> Result<i64, sqlx::Error> {
        let mut q = sqlx::query_scalar::<_, i64>(query);
        for arg in args {
            q = q.bind(arg.clone());
        }
        q.fetch_one(&self.pool).await
    }

    async fn select_rows(&self, query: &str, args: &[SqlArg]) -> Result<Vec<T>, sqlx::Error> {
        let mut q = sqlx::query_as::<_, T>(query);
        for arg in args {
            q = q.bind(arg.clone());
        }
        q.fetch_all(&self.pool).await
    }
}

/// A result row as a JSON object keyed by column name, for resources without a Rust row type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonRow(pub Value);

impl JsonRow {
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<'r> FromRow<'r, PgRow> for JsonRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(JsonRow(row_to_json(row)))
    }
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::{Column, Row};
    let map = row
        .columns()
        .iter()
        .map(|col| (col.name().to_string(), cell_to_value(row, col.ordinal())))
        .collect();
    Value::Object(map)
}

// Postgres decoding is type-checked, so only the matching Rust type decodes each column.
fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::from(n);
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::from(n);
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::from(n);
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        return serde_json::Number::from_f64(n as f64).map(Value::Number).unwrap_or(Value::Null);
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        return serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null);
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}
