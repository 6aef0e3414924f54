//! Asset document view.

use crate::document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A view over a fetched asset document (uploaded media metadata).
///
/// Wraps the raw JSON; accessors are lenient and return `None` / empty for
/// missing or mismatched fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    json: Value,
}

impl Asset {
    /// Wraps a raw asset document.
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// The asset's unique identifier.
    pub fn uid(&self) -> Option<&str> {
        document::string_at(&self.json, "uid")
    }

    /// The asset's display title.
    pub fn title(&self) -> Option<&str> {
        document::string_at(&self.json, "title")
    }

    /// The uploaded file's name.
    pub fn file_name(&self) -> Option<&str> {
        document::string_at(&self.json, "filename")
    }

    /// The delivery URL for the file content.
    pub fn url(&self) -> Option<&str> {
        document::string_at(&self.json, "url")
    }

    /// The MIME type of the file.
    pub fn content_type(&self) -> Option<&str> {
        document::string_at(&self.json, "content_type")
    }

    /// File size in bytes. The API reports this as a decimal string.
    pub fn file_size(&self) -> Option<u64> {
        document::string_at(&self.json, "file_size")
            .and_then(|s| s.parse().ok())
            .or_else(|| document::integer_at(&self.json, "file_size").map(|n| n as u64))
    }

    /// Tags attached to the asset.
    pub fn tags(&self) -> Vec<String> {
        document::string_list_at(&self.json, "tags")
    }

    /// When the asset was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        document::date_at(&self.json, "created_at")
    }

    /// When the asset was last updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        document::date_at(&self.json, "updated_at")
    }

    /// Reads an arbitrary field from the underlying document.
    pub fn value(&self, key: &str) -> Option<&Value> {
        document::value_at(&self.json, key)
    }

    /// The underlying JSON document.
    pub fn json(&self) -> &Value {
        &self.json
    }
}
