//! Group field view.
//!
//! A group is a nested object field on an entry. Groups can themselves
//! contain assets and further groups, so resolution recurses.

use crate::document;
use crate::{Asset, Entry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A view over a nested group field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    json: Value,
}

impl Group {
    /// Wraps a raw group object.
    pub fn new(json: Value) -> Self {
        Self { json }
    }

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

    /// Reads an arbitrary field.
    pub fn value(&self, key: &str) -> Option<&Value> {
        document::value_at(&self.json, key)
    }

    /// Resolves a single asset field within the group.
    pub fn asset(&self, key: &str) -> Option<Asset> {
        document::object_at(&self.json, key).map(Asset::new)
    }

    /// Resolves a multi-asset field within the group.
    pub fn assets(&self, key: &str) -> Vec<Asset> {
        document::object_list_at(&self.json, key)
            .into_iter()
            .map(Asset::new)
            .collect()
    }

    /// Resolves a nested group field.
    pub fn group(&self, key: &str) -> Option<Group> {
        document::object_at(&self.json, key).map(Group::new)
    }

    /// Resolves a repeated nested group field.
    pub fn groups(&self, key: &str) -> Vec<Group> {
        document::object_list_at(&self.json, key)
            .into_iter()
            .map(Group::new)
            .collect()
    }

    /// Resolves referenced entries embedded in this group.
    ///
    /// Local transform only; the references must have been fetched via
    /// `include_reference` at query time.
    pub fn all_entries(&self, reference_key: &str, reference_content_type: &str) -> Vec<Entry> {
        document::object_list_at(&self.json, reference_key)
            .into_iter()
            .map(|doc| Entry::new(reference_content_type, doc))
            .collect()
    }

    /// The underlying JSON object.
    pub fn json(&self) -> &Value {
        &self.json
    }
}
