//! Positional parameter binding

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgArgumentBuffer, PgArguments, PgTypeInfo};
use sqlx::query::Query;
use sqlx::{Encode, Postgres, Type};

use crate::value::SqlValue;

/// NULL with no declared type (OID 0); the server infers it from context,
/// so `INSERT .. VALUES ($1)` works for a NULL into any column type.
#[derive(Debug, Clone, Copy)]
pub struct UntypedNull;

impl Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        Ok(IsNull::Yes)
    }
}

/// Bind `params` to `$1..$k` in order.
///
/// No coercion or validation happens here; the driver decides whether the
/// bound types fit the statement.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(UntypedNull),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float32(f) => query.bind(*f),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Decimal(d) => query.bind(*d),
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Bytes(bytes) => query.bind(bytes.as_slice()),
            SqlValue::Date(d) => query.bind(*d),
            SqlValue::Time(t) => query.bind(*t),
            SqlValue::Timestamp(ts) => query.bind(*ts),
            SqlValue::TimestampTz(ts) => query.bind(*ts),
            SqlValue::Interval(interval) => query.bind(interval.clone()),
            SqlValue::Uuid(u) => query.bind(*u),
            SqlValue::Json(v) => query.bind(v),
        };
    }
    query
}

/// Build a bound query in one step.
pub fn prepare<'q>(sql: &'q str, params: &'q [SqlValue]) -> Query<'q, Postgres, PgArguments> {
    bind_params(sqlx::query(sql), params)
}
