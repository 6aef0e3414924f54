//! Entry document view and local reference resolution.

use crate::document;
use crate::{Asset, Group};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A view over one fetched entry document, bound to its content type.
///
/// Entries carry no identity beyond the wrapped document; they are cheap to
/// clone and recreated per fetch. All accessors are lenient: a missing key or
/// a type mismatch reads as `None` / empty, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    content_type_uid: String,
    json: Value,
}

impl Entry {
    /// Wraps a raw entry document fetched for the given content type.
    pub fn new(content_type_uid: impl Into<String>, json: Value) -> Self {
        Self {
            content_type_uid: content_type_uid.into(),
            json,
        }
    }

    /// The content type this entry belongs to.
    pub fn content_type_uid(&self) -> &str {
        &self.content_type_uid
    }

    /// The entry's unique identifier.
    pub fn uid(&self) -> Option<&str> {
        document::string_at(&self.json, "uid")
    }

    /// The entry's title field.
    pub fn title(&self) -> Option<&str> {
        document::string_at(&self.json, "title")
    }

    /// The entry's URL field, when the content type defines one.
    pub fn url(&self) -> Option<&str> {
        document::string_at(&self.json, "url")
    }

    /// The locale this entry variant was published in.
    pub fn locale(&self) -> Option<&str> {
        document::string_at(&self.json, "locale")
    }

    /// Tags attached to the entry.
    pub fn tags(&self) -> Vec<String> {
        document::string_list_at(&self.json, "tags")
    }

    /// The publish version of the entry.
    pub fn version(&self) -> Option<i64> {
        document::integer_at(&self.json, "_version")
    }

    /// When the entry was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        document::date_at(&self.json, "created_at")
    }

    /// When the entry was last updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        document::date_at(&self.json, "updated_at")
    }

    /// Who created the entry.
    pub fn created_by(&self) -> Option<&str> {
        document::string_at(&self.json, "created_by")
    }

    /// Who last updated the entry.
    pub fn updated_by(&self) -> Option<&str> {
        document::string_at(&self.json, "updated_by")
    }

    // ── Typed field accessors ───────────────────────────────────────

    /// Reads a string field.
    pub fn string(&self, key: &str) -> Option<&str> {
        document::string_at(&self.json, key)
    }

    /// Reads a numeric field.
    pub fn number(&self, key: &str) -> Option<f64> {
        document::number_at(&self.json, key)
    }

    /// Reads an integer field.
    pub fn integer(&self, key: &str) -> Option<i64> {
        document::integer_at(&self.json, key)
    }

    /// Reads a boolean field.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        document::boolean_at(&self.json, key)
    }

    /// Reads an ISO-8601 date field.
    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        document::date_at(&self.json, key)
    }

    /// Reads an arbitrary field from the underlying document.
    pub fn value(&self, key: &str) -> Option<&Value> {
        document::value_at(&self.json, key)
    }

    // ── Reference resolution ────────────────────────────────────────
    //
    // These are synchronous transforms of already-fetched data. Nothing
    // here issues a network call; references appear in the document only
    // when the query included them.

    /// Resolves a single asset field.
    pub fn asset(&self, key: &str) -> Option<Asset> {
        document::object_at(&self.json, key).map(Asset::new)
    }

    /// Resolves a multi-asset field.
    pub fn assets(&self, key: &str) -> Vec<Asset> {
        document::object_list_at(&self.json, key)
            .into_iter()
            .map(Asset::new)
            .collect()
    }

    /// Resolves a group field.
    pub fn group(&self, key: &str) -> Option<Group> {
        document::object_at(&self.json, key).map(Group::new)
    }

    /// Resolves a repeated group field.
    pub fn groups(&self, key: &str) -> Vec<Group> {
        document::object_list_at(&self.json, key)
            .into_iter()
            .map(Group::new)
            .collect()
    }

    /// Resolves referenced entries under `reference_key`, binding each to
    /// `reference_content_type`.
    pub fn all_entries(&self, reference_key: &str, reference_content_type: &str) -> Vec<Entry> {
        document::object_list_at(&self.json, reference_key)
            .into_iter()
            .map(|doc| Entry::new(reference_content_type, doc))
            .collect()
    }

    /// The underlying JSON document.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Consumes the view, returning the underlying document.
    pub fn into_json(self) -> Value {
        self.json
    }
}
