//! Content types and single-entry fetches.

use crate::error::{DeliveryError, DeliveryResult};
use crate::query::Query;
use crate::stack::Stack;
use serde_json::Value;
use strata_query::QueryState;
use strata_types::Entry;
use tracing::debug;

/// A named schema for entries within a stack.
pub struct ContentType {
    stack: Stack,
    uid: String,
}

impl ContentType {
    pub(crate) fn new(stack: Stack, uid: impl Into<String>) -> Self {
        Self {
            stack,
            uid: uid.into(),
        }
    }

    /// The content type's uid.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Starts a filtered query over this content type's entries.
    pub fn query(&self) -> Query {
        Query::new(self.stack.clone(), self.uid.clone())
    }

    /// Addresses a single entry by uid.
    pub fn entry(&self, entry_uid: impl Into<String>) -> EntryFetcher {
        EntryFetcher::new(self.stack.clone(), self.uid.clone(), entry_uid)
    }

    /// Fetches this content type's schema.
    pub async fn fetch(&self) -> DeliveryResult<Value> {
        if self.uid.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "content type uid must not be empty".to_string(),
            ));
        }

        let path = format!("/v3/content_types/{}", urlencoding::encode(&self.uid));
        let body = self.stack.get(&path, &[], &[]).await?;
        body.get("content_type")
            .cloned()
            .ok_or_else(|| DeliveryError::not_found(format!("content type {} not found", self.uid)))
    }
}

/// Fetches one entry, with projection, locale, and reference options.
///
/// Reuses the query-state serializer: an entry fetch is the query wire
/// format minus filters and pagination.
pub struct EntryFetcher {
    stack: Stack,
    entry_uid: String,
    state: QueryState,
    headers: Vec<(String, String)>,
}

impl EntryFetcher {
    pub(crate) fn new(
        stack: Stack,
        content_type_uid: impl Into<String>,
        entry_uid: impl Into<String>,
    ) -> Self {
        Self {
            stack,
            entry_uid: entry_uid.into(),
            state: QueryState::new(content_type_uid),
            headers: Vec::new(),
        }
    }

    /// The entry's uid.
    pub fn uid(&self) -> &str {
        &self.entry_uid
    }

    /// Requests the entry in a specific locale.
    pub fn locale(&mut self, locale: &str) -> &mut Self {
        self.state.locale(locale);
        self
    }

    /// Restricts the response to the given fields.
    pub fn only<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.only(fields);
        self
    }

    /// Drops the given fields from the response.
    pub fn except<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.except(fields);
        self
    }

    /// Resolves a reference field server-side.
    pub fn include_reference(&mut self, reference: &str) -> &mut Self {
        self.state.include_reference(reference);
        self
    }

    /// Falls back to the default locale when untranslated.
    pub fn include_fallback(&mut self) -> &mut Self {
        self.state.include_fallback();
        self
    }

    /// Resolves embedded items in rich-text fields.
    pub fn include_embedded_items(&mut self) -> &mut Self {
        self.state.include_embedded_items();
        self
    }

    /// Asks the response to carry the content type schema.
    pub fn include_content_type(&mut self) -> &mut Self {
        self.state.include_content_type();
        self
    }

    /// Adds a call-scoped header for this fetch only.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Fetches the entry.
    pub async fn fetch(&self) -> DeliveryResult<Entry> {
        self.state.validate()?;
        if self.entry_uid.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "entry uid must not be empty".to_string(),
            ));
        }

        let path = format!(
            "/v3/content_types/{}/entries/{}",
            urlencoding::encode(self.state.content_type_uid()),
            urlencoding::encode(&self.entry_uid)
        );

        let mut params = self.state.to_params();
        params.push((
            "environment".to_string(),
            self.stack.environment().to_string(),
        ));

        debug!("fetching entry {}", self.entry_uid);
        let body = self.stack.get(&path, &self.headers, &params).await?;

        body.get("entry")
            .cloned()
            .map(|doc| Entry::new(self.state.content_type_uid(), doc))
            .ok_or_else(|| DeliveryError::not_found(format!("entry {} not found", self.entry_uid)))
    }
}
