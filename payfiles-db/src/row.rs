//! Generic decoding of `PgRow` into `ResultRow`
//!
//! Column metadata (label and PostgreSQL type) is read once per query
//! execution into a `ColumnLayout`, then applied to every row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::types::{PgInterval, PgMoney};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

use crate::error::{DbError, Result};
use crate::value::{ResultRow, SqlValue};

/// How a column's cells are decoded, derived from its type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    /// `"char"`, the one-byte internal type
    Char,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Money,
    Text,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    Uuid,
    Json,
    Void,
    /// Anything else (enums, domains, extension types); read as text when
    /// the server sends text, raw bytes otherwise
    Other(String),
}

impl ColumnKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "BOOL" => Self::Bool,
            "\"CHAR\"" => Self::Char,
            "INT2" => Self::Int2,
            "INT4" => Self::Int4,
            "INT8" => Self::Int8,
            "FLOAT4" => Self::Float4,
            "FLOAT8" => Self::Float8,
            "NUMERIC" => Self::Numeric,
            "MONEY" => Self::Money,
            "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => Self::Text,
            "BYTEA" => Self::Bytes,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            "INTERVAL" => Self::Interval,
            "UUID" => Self::Uuid,
            "JSON" | "JSONB" => Self::Json,
            "VOID" => Self::Void,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Column labels and decoders for one result set
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Vec<(String, ColumnKind)>,
}

impl ColumnLayout {
    /// Capture the layout from any row of the result set.
    pub fn of(row: &PgRow) -> Self {
        let columns = row
            .columns()
            .iter()
            .map(|col| {
                (
                    col.name().to_string(),
                    ColumnKind::from_type_name(col.type_info().name()),
                )
            })
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Decode one cell by ordinal.
    pub fn decode_cell(&self, row: &PgRow, index: usize) -> Result<SqlValue> {
        let (_, kind) = self.columns.get(index).ok_or_else(|| {
            DbError::Sqlx(sqlx::Error::ColumnIndexOutOfBounds {
                index,
                len: self.columns.len(),
            })
        })?;
        decode(row, index, kind)
    }

    /// Decode a whole row into a label-keyed map.
    pub fn decode_row(&self, row: &PgRow) -> Result<ResultRow> {
        let mut out = ResultRow::with_capacity(self.columns.len());
        for (index, (name, kind)) in self.columns.iter().enumerate() {
            out.insert(name.clone(), decode(row, index, kind)?);
        }
        Ok(out)
    }
}

fn get<'r, T>(row: &'r PgRow, index: usize) -> Result<Option<T>>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    Ok(row.try_get::<Option<T>, _>(index)?)
}

fn decode(row: &PgRow, index: usize, kind: &ColumnKind) -> Result<SqlValue> {
    let value = match kind {
        ColumnKind::Bool => get::<bool>(row, index)?.map(SqlValue::Bool),
        ColumnKind::Char => {
            get::<i8>(row, index)?.map(|c| SqlValue::Text(char::from(c as u8).to_string()))
        }
        ColumnKind::Int2 => get::<i16>(row, index)?.map(SqlValue::from),
        ColumnKind::Int4 => get::<i32>(row, index)?.map(SqlValue::from),
        ColumnKind::Int8 => get::<i64>(row, index)?.map(SqlValue::Int),
        ColumnKind::Float4 => get::<f32>(row, index)?.map(SqlValue::Float32),
        ColumnKind::Float8 => get::<f64>(row, index)?.map(SqlValue::Float),
        ColumnKind::Numeric => get::<Decimal>(row, index)?.map(SqlValue::Decimal),
        ColumnKind::Money => get::<PgMoney>(row, index)?.map(|m| SqlValue::Decimal(m.to_decimal(2))),
        ColumnKind::Text => get::<String>(row, index)?.map(SqlValue::Text),
        ColumnKind::Bytes => get::<Vec<u8>>(row, index)?.map(SqlValue::Bytes),
        ColumnKind::Date => get::<NaiveDate>(row, index)?.map(SqlValue::Date),
        ColumnKind::Time => get::<NaiveTime>(row, index)?.map(SqlValue::Time),
        ColumnKind::Timestamp => get::<NaiveDateTime>(row, index)?.map(SqlValue::Timestamp),
        ColumnKind::TimestampTz => get::<DateTime<Utc>>(row, index)?.map(SqlValue::TimestampTz),
        ColumnKind::Interval => get::<PgInterval>(row, index)?.map(SqlValue::Interval),
        ColumnKind::Uuid => get::<Uuid>(row, index)?.map(SqlValue::Uuid),
        ColumnKind::Json => get::<serde_json::Value>(row, index)?.map(SqlValue::Json),
        ColumnKind::Void => None,
        ColumnKind::Other(_) => decode_other(row, index)?,
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

/// Enum labels and most extension types arrive as UTF-8 text; anything that
/// doesn't is kept as its raw bytes.
fn decode_other(row: &PgRow, index: usize) -> Result<Option<SqlValue>> {
    if let Ok(text) = row.try_get_unchecked::<Option<String>, _>(index) {
        return Ok(text.map(SqlValue::Text));
    }
    let bytes = row.try_get_unchecked::<Option<Vec<u8>>, _>(index)?;
    Ok(bytes.map(SqlValue::Bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_family() {
        assert_eq!(ColumnKind::from_type_name("INT2"), ColumnKind::Int2);
        assert_eq!(ColumnKind::from_type_name("INT4"), ColumnKind::Int4);
        assert_eq!(ColumnKind::from_type_name("INT8"), ColumnKind::Int8);
    }

    #[test]
    fn test_text_family() {
        for name in ["TEXT", "VARCHAR", "CHAR", "BPCHAR", "NAME"] {
            assert_eq!(ColumnKind::from_type_name(name), ColumnKind::Text, "{name}");
        }
    }

    #[test]
    fn test_temporal_kinds() {
        assert_eq!(ColumnKind::from_type_name("DATE"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMP"), ColumnKind::Timestamp);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMPTZ"), ColumnKind::TimestampTz);
    }

    #[test]
    fn test_numeric_and_json_kinds() {
        assert_eq!(ColumnKind::from_type_name("NUMERIC"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from_type_name("MONEY"), ColumnKind::Money);
        assert_eq!(ColumnKind::from_type_name("JSON"), ColumnKind::Json);
        assert_eq!(ColumnKind::from_type_name("JSONB"), ColumnKind::Json);
        assert_eq!(ColumnKind::from_type_name("INTERVAL"), ColumnKind::Interval);
        assert_eq!(ColumnKind::from_type_name("\"CHAR\""), ColumnKind::Char);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        assert_eq!(
            ColumnKind::from_type_name("payment_status"),
            ColumnKind::Other("payment_status".to_string())
        );
    }
}
