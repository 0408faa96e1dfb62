//! Readers for loosely typed values. The upstream API and city files written
//! by older tooling carry numbers either as JSON numbers or numeric strings,
//! and dates with stray whitespace or a time suffix.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A finite number from a JSON number or a numeric string.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// An integral number, e.g. a status code sent as `200`, `"200"` or `200.0`.
pub fn integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let n = number(value)?;
    (n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

/// `YYYY-MM-DD`, ignoring surrounding whitespace and any `T..`/` ..` time part.
pub fn date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    number(&value).ok_or_else(|| D::Error::custom(format!("invalid price: {value}")))
}

/// Missing or null reads as 200: older files only ever stored successful fetches.
pub fn deserialize_status_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(200);
    }
    integer(&value).ok_or_else(|| D::Error::custom(format!("invalid status code: {value}")))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw:?}")))
}

/// Null reads as absent so the field's default applies.
pub fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
}
