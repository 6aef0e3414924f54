//! Response pages: query results and sync delta pages.
//!
//! Pages are constructed once from a single response body and immutable
//! afterwards. Missing arrays degrade to empty collections; the lenient-read
//! policy of the document views applies to envelopes too.

use crate::document;
use crate::{Asset, Entry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of one entry query execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    entries: Vec<Entry>,
    count: Option<u64>,
    schema: Option<Value>,
    content_type: Option<Value>,
}

impl QueryResult {
    /// Folds one response body into a result, binding entries to the
    /// queried content type.
    pub fn from_response(content_type_uid: &str, body: &Value) -> Self {
        let entries = document::object_list_at(body, "entries")
            .into_iter()
            .map(|doc| Entry::new(content_type_uid, doc))
            .collect();

        Self {
            entries,
            count: body.get("count").and_then(Value::as_u64),
            schema: document::value_at(body, "schema").cloned(),
            content_type: document::value_at(body, "content_type").cloned(),
        }
    }

    /// The matched entries, in response order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consumes the result, returning the entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Total match count, present when the query asked for it.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// The global field schema, present when the query asked for it.
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// The content type schema, present when the query asked for it.
    pub fn content_type(&self) -> Option<&Value> {
        self.content_type.as_ref()
    }
}

/// The result of one asset listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetList {
    assets: Vec<Asset>,
    count: Option<u64>,
}

impl AssetList {
    /// Folds one response body into an asset list.
    pub fn from_response(body: &Value) -> Self {
        let assets = document::object_list_at(body, "assets")
            .into_iter()
            .map(Asset::new)
            .collect();

        Self {
            assets,
            count: body.get("count").and_then(Value::as_u64),
        }
    }

    /// The listed assets, in response order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Total asset count, present when the listing asked for it.
    pub fn count(&self) -> Option<u64> {
        self.count
    }
}

/// One item in a sync delta page (a published entry, deleted asset, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncItem {
    json: Value,
}

impl SyncItem {
    /// Wraps a raw sync item envelope.
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// The item's event class, e.g. `entry_published` or `asset_deleted`.
    pub fn item_type(&self) -> Option<&str> {
        document::string_at(&self.json, "type")
    }

    /// The content type of the affected entry, when the item is an entry.
    pub fn content_type_uid(&self) -> Option<&str> {
        document::string_at(&self.json, "content_type_uid")
    }

    /// The item's document payload.
    pub fn data(&self) -> Option<&Value> {
        document::value_at(&self.json, "data")
    }

    /// The affected entry, bound to its content type. `None` for items
    /// without both a payload and a content type (asset events).
    pub fn entry(&self) -> Option<Entry> {
        let content_type = self.content_type_uid()?.to_string();
        self.data().cloned().map(|doc| Entry::new(content_type, doc))
    }

    /// The underlying item envelope.
    pub fn json(&self) -> &Value {
        &self.json
    }
}

/// One page of the sync delta feed.
///
/// A page terminates in exactly one of two tokens: a `pagination_token`
/// means more pages remain and the caller should resume with it; a
/// `sync_token` means the feed is drained and the token is the checkpoint
/// for the next incremental run. If a response carries both, the pagination
/// token wins and the sync token is dropped — an undrained feed has no
/// usable checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPage {
    items: Vec<SyncItem>,
    skip: Option<u64>,
    limit: Option<u64>,
    total_count: Option<u64>,
    sync_token: Option<String>,
    pagination_token: Option<String>,
}

impl SyncPage {
    /// Folds one sync response body into a page, enforcing token
    /// exclusivity.
    pub fn from_response(body: &Value) -> Self {
        let items = document::object_list_at(body, "items")
            .into_iter()
            .map(SyncItem::new)
            .collect();

        let pagination_token = document::string_at(body, "pagination_token").map(str::to_string);
        let sync_token = if pagination_token.is_some() {
            None
        } else {
            document::string_at(body, "sync_token").map(str::to_string)
        };

        Self {
            items,
            skip: body.get("skip").and_then(Value::as_u64),
            limit: body.get("limit").and_then(Value::as_u64),
            total_count: body.get("total_count").and_then(Value::as_u64),
            sync_token,
            pagination_token,
        }
    }

    /// The delta items on this page, in feed order.
    pub fn items(&self) -> &[SyncItem] {
        &self.items
    }

    /// Offset of this page within the feed.
    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    /// Page size reported by the feed.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Total item count across the feed, when reported.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Checkpoint token for the next incremental run. Present only on the
    /// final page of a drained feed.
    pub fn sync_token(&self) -> Option<&str> {
        self.sync_token.as_deref()
    }

    /// Resumption token for the next page of an undrained feed.
    pub fn pagination_token(&self) -> Option<&str> {
        self.pagination_token.as_deref()
    }

    /// Whether more pages remain.
    pub fn has_more(&self) -> bool {
        self.pagination_token.is_some()
    }
}
