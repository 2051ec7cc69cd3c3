//! Field values and their SOQL literal form.
//!
//! SOQL has no bind parameters, so every value is rendered into the query
//! string as a literal. Strings are single-quoted with backslash escaping;
//! date and datetime literals are unquoted ISO-8601.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value as Json;

/// A single field value, either bound for the remote platform or
/// materialized from a result payload.
#[derive(Clone, Debug, PartialEq)]
pub enum SoqlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl SoqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SoqlValue::Null)
    }

    /// Render the value as a SOQL literal.
    pub fn to_literal(&self) -> String {
        match self {
            SoqlValue::Null => "null".to_string(),
            SoqlValue::Boolean(value) => value.to_string(),
            SoqlValue::Integer(value) => value.to_string(),
            SoqlValue::Double(value) => value.to_string(),
            SoqlValue::String(value) => quote_string(value),
            SoqlValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            SoqlValue::DateTime(value) => value.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Convert a JSON scalar from a result payload. Strings matching the
    /// platform's date and datetime wire formats become typed values.
    pub fn from_json(value: &Json) -> SoqlValue {
        match value {
            Json::Null => SoqlValue::Null,
            Json::Bool(b) => SoqlValue::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SoqlValue::Integer(i)
                } else {
                    SoqlValue::Double(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => from_string(s),
            // Nested objects and arrays are not scalar fields; keep their
            // JSON text so nothing is silently lost.
            other => SoqlValue::String(other.to_string()),
        }
    }

    /// Convert into the JSON form used by DML payloads.
    pub fn to_json(&self) -> Json {
        match self {
            SoqlValue::Null => Json::Null,
            SoqlValue::Boolean(value) => Json::Bool(*value),
            SoqlValue::Integer(value) => Json::from(*value),
            SoqlValue::Double(value) => {
                serde_json::Number::from_f64(*value).map_or(Json::Null, Json::Number)
            }
            SoqlValue::String(value) => Json::String(value.clone()),
            SoqlValue::Date(value) => Json::String(value.format("%Y-%m-%d").to_string()),
            SoqlValue::DateTime(value) => {
                Json::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }

    /// Borrow the inner string for string-typed values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SoqlValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for SoqlValue {
    fn from(value: &str) -> Self {
        SoqlValue::String(value.to_string())
    }
}

impl From<String> for SoqlValue {
    fn from(value: String) -> Self {
        SoqlValue::String(value)
    }
}

impl From<i64> for SoqlValue {
    fn from(value: i64) -> Self {
        SoqlValue::Integer(value)
    }
}

impl From<f64> for SoqlValue {
    fn from(value: f64) -> Self {
        SoqlValue::Double(value)
    }
}

impl From<bool> for SoqlValue {
    fn from(value: bool) -> Self {
        SoqlValue::Boolean(value)
    }
}

impl From<NaiveDate> for SoqlValue {
    fn from(value: NaiveDate) -> Self {
        SoqlValue::Date(value)
    }
}

impl From<DateTime<Utc>> for SoqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SoqlValue::DateTime(value)
    }
}

fn from_string(s: &str) -> SoqlValue {
    // Datetime fields arrive as "2020-05-01T12:00:00.000+0000".
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3f%z") {
        return SoqlValue::DateTime(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return SoqlValue::DateTime(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return SoqlValue::Date(date);
    }
    SoqlValue::String(s.to_string())
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
