//! Typed access to payload fields
//!
//! Paths are dotted (`object_attributes.title`). Absent or `null` fields
//! become [`DomainError::MissingField`], mistyped ones
//! [`DomainError::InvalidField`].

use serde_json::Value;

use crate::domain::errors::DomainError;

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// Required string field
pub fn str_at<'a>(value: &'a Value, path: &str) -> Result<&'a str, DomainError> {
    match lookup(value, path) {
        None => Err(DomainError::missing(path)),
        Some(v) => v.as_str().ok_or_else(|| DomainError::invalid(path, "string")),
    }
}

/// Optional string field; empty strings count as absent
pub fn opt_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Required field rendered as text (strings verbatim, numbers in decimal)
pub fn display_at(value: &Value, path: &str) -> Result<String, DomainError> {
    match lookup(value, path) {
        None => Err(DomainError::missing(path)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(DomainError::invalid(path, "string or number")),
    }
}

/// Optional unsigned integer field
pub fn opt_u64(value: &Value, path: &str) -> Option<u64> {
    lookup(value, path).and_then(Value::as_u64)
}

/// Optional duration in whole seconds; GitLab sends integers or floats
pub fn opt_seconds(value: &Value, path: &str) -> Option<u64> {
    lookup(value, path)
        .and_then(Value::as_f64)
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.round() as u64)
}

/// Optional boolean field, `false` when absent
pub fn flag(value: &Value, path: &str) -> bool {
    lookup(value, path).and_then(Value::as_bool).unwrap_or(false)
}

/// Required array field
pub fn array_at<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], DomainError> {
    match lookup(value, path) {
        None => Err(DomainError::missing(path)),
        Some(v) => v
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| DomainError::invalid(path, "array")),
    }
}

/// Optional nested object
pub fn object_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    lookup(value, path).filter(|v| v.is_object())
}

/// Whether the field is absent or `null`
pub fn is_null(value: &Value, path: &str) -> bool {
    lookup(value, path).is_none()
}
