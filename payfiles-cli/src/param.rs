//! `kind:value` parameter parsing for the command line

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use payfiles_db::SqlValue;
use rust_decimal::Decimal;

/// Parse one `-p` argument.
///
/// A value whose prefix is not a known kind binds as text unchanged, so
/// `-p 'a:b'` is the text `a:b`. Use `text:` to force text explicitly.
pub fn parse_param(raw: &str) -> Result<SqlValue> {
    if raw == "null" {
        return Ok(SqlValue::Null);
    }

    let Some((kind, value)) = raw.split_once(':') else {
        return Ok(SqlValue::Text(raw.to_string()));
    };

    let parsed = match kind {
        "null" => SqlValue::Null,
        "text" => SqlValue::Text(value.to_string()),
        "bool" => SqlValue::Bool(parse_bool(value)?),
        "int" => SqlValue::Int(value.parse().with_context(|| format!("invalid int: {value}"))?),
        "float" => {
            SqlValue::Float(value.parse().with_context(|| format!("invalid float: {value}"))?)
        }
        "decimal" => SqlValue::Decimal(
            value
                .parse::<Decimal>()
                .with_context(|| format!("invalid decimal: {value}"))?,
        ),
        "json" => SqlValue::Json(
            serde_json::from_str(value).with_context(|| format!("invalid json: {value}"))?,
        ),
        "bytes" => SqlValue::Bytes(parse_hex(value)?),
        "date" => SqlValue::Date(
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .with_context(|| format!("invalid date (expected YYYY-MM-DD): {value}"))?,
        ),
        "time" => SqlValue::Time(
            NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
                .with_context(|| format!("invalid time (expected HH:MM:SS): {value}"))?,
        ),
        "timestamp" => SqlValue::Timestamp(
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
                .with_context(|| format!("invalid timestamp: {value}"))?,
        ),
        "timestamptz" => SqlValue::TimestampTz(
            DateTime::parse_from_rfc3339(value)
                .with_context(|| format!("invalid RFC 3339 timestamp: {value}"))?
                .with_timezone(&Utc),
        ),
        "uuid" => SqlValue::Uuid(
            uuid::Uuid::parse_str(value).with_context(|| format!("invalid uuid: {value}"))?,
        ),
        _ => SqlValue::Text(raw.to_string()),
    };
    Ok(parsed)
}

pub fn parse_params(raw: &[String]) -> Result<Vec<SqlValue>> {
    raw.iter()
        .enumerate()
        .map(|(i, p)| parse_param(p).with_context(|| format!("parameter ${}", i + 1)))
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Ok(true),
        "false" | "f" | "0" | "no" => Ok(false),
        _ => bail!("invalid bool: {value}"),
    }
}

fn parse_hex(value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("\\x").unwrap_or(value);
    if digits.len() % 2 != 0 {
        bail!("hex bytes need an even number of digits: {value}");
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| anyhow!("invalid hex bytes: {value}"))
        })
        .collect()
}
