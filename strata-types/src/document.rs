//! Lenient field access over JSON documents.
//!
//! All document views (entries, assets, groups) share the same read rules:
//! a missing key, a `null`, or a type mismatch yields `None` / empty rather
//! than an error. These helpers centralize that policy.

use crate::date::parse_iso8601;
use chrono::{DateTime, Utc};
use serde_json::Value;

pub(crate) fn value_at<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    match doc.get(key) {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}

pub(crate) fn string_at<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    value_at(doc, key).and_then(Value::as_str)
}

pub(crate) fn number_at(doc: &Value, key: &str) -> Option<f64> {
    value_at(doc, key).and_then(Value::as_f64)
}

pub(crate) fn integer_at(doc: &Value, key: &str) -> Option<i64> {
    value_at(doc, key).and_then(Value::as_i64)
}

pub(crate) fn boolean_at(doc: &Value, key: &str) -> Option<bool> {
    value_at(doc, key).and_then(Value::as_bool)
}

pub(crate) fn date_at(doc: &Value, key: &str) -> Option<DateTime<Utc>> {
    string_at(doc, key).and_then(parse_iso8601)
}

/// Reads a string array; non-string elements are skipped.
pub(crate) fn string_list_at(doc: &Value, key: &str) -> Vec<String> {
    value_at(doc, key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Reads an object array, cloning each element; non-objects are skipped.
pub(crate) fn object_list_at(doc: &Value, key: &str) -> Vec<Value> {
    value_at(doc, key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|v| v.is_object())
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn object_at(doc: &Value, key: &str) -> Option<Value> {
    value_at(doc, key).filter(|v| v.is_object()).cloned()
}
