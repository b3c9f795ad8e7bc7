//! Positional arguments produced by the clause builder, bindable through sqlx.

use chrono::{DateTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a numbered placeholder. Each variant is sent with its own Postgres type.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlArg {
    Text(String),
    Bool(bool),
    Float(f64),
    Int(i64),
    Uuid(uuid::Uuid),
    Timestamp(DateTime<Utc>),
}

impl<'q> Encode<'q, Postgres> for SqlArg {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlArg::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf),
            SqlArg::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf),
            SqlArg::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlArg::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlArg::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
            SqlArg::Timestamp(t) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(t, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlArg::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlArg::Bool(_) => <bool as Type<Postgres>>::type_info(),
            SqlArg::Float(_) => <f64 as Type<Postgres>>::type_info(),
            SqlArg::Int(_) => <i64 as Type<Postgres>>::type_info(),
            SqlArg::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
            SqlArg::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlArg {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}
