//! Lenient field access over untyped JSON items.
//!
//! Upstream payloads are loosely typed and occasionally inconsistent, so
//! adapters never deserialize items into strict structs. Every accessor here
//! returns a fallback instead of failing.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// A string field, if present and a string.
pub(crate) fn str_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// A string field or `default`.
pub(crate) fn string_or(item: &Value, key: &str, default: &str) -> String {
    str_field(item, key).unwrap_or(default).to_string()
}

/// A non-empty string field. Numbers are rendered as text.
pub(crate) fn opt_string(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An integer field. Floats truncate, numeric strings parse, anything else
/// is zero.
pub(crate) fn int_or_zero(item: &Value, key: &str) -> i64 {
    match item.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// A float field, or zero.
pub(crate) fn float_or_zero(item: &Value, key: &str) -> f64 {
    match item.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// A positive integer field as a 1-based rank.
pub(crate) fn position(item: &Value, key: &str) -> Option<u32> {
    u32::try_from(int_or_zero(item, key)).ok().filter(|p| *p > 0)
}

/// An array field, or an empty slice.
pub(crate) fn array<'a>(item: &'a Value, key: &str) -> &'a [Value] {
    item.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A list of strings given either as a JSON array or a comma-separated string.
pub(crate) fn string_list(item: &Value, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// An RFC 3339 timestamp field.
pub(crate) fn rfc3339(item: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = str_field(item, key)?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A Unix timestamp in (possibly fractional) seconds.
pub(crate) fn unix_seconds(item: &Value, key: &str) -> Option<DateTime<Utc>> {
    let secs = item.get(key)?.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    let millis = (secs * 1000.0) as i64;
    Utc.timestamp_millis_opt(millis).single()
}
