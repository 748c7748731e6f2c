//! Helpers for reading loosely-typed upstream JSON.
//!
//! FMS returns the same logical field as a string on one endpoint and a
//! number on another, and sometimes omits it entirely. Everything that
//! crosses into a domain type goes through these helpers so that a missing
//! or oddly-typed field degrades to an empty value instead of an error.

use serde_json::Value;

/// Render a JSON value as trimmed text. `null` and missing values become `""`.
pub fn clean(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Read `key` from an object as trimmed text.
pub fn text(raw: &Value, key: &str) -> String {
    raw.get(key).map(clean).unwrap_or_default()
}

/// Return the first non-empty text among `keys`, in order.
pub fn first_text(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| text(raw, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Parse an integer identifier from a JSON number or a numeric string.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Return the first array found at one of the given JSON pointers.
pub fn first_array<'a>(raw: &'a Value, pointers: &[&str]) -> &'a [Value] {
    pointers
        .iter()
        .find_map(|p| raw.pointer(p).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
