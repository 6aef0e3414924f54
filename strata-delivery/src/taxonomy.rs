//! Entry queries across taxonomies.
//!
//! Taxonomy queries hit a stack-wide endpoint and so return entries from
//! many content types; each entry is bound to the content type the response
//! reports for it.

use crate::error::DeliveryResult;
use crate::stack::Stack;
use serde_json::Value;
use strata_query::FilterMap;
use strata_types::Entry;
use tracing::debug;

/// A filtered query over entries classified under the stack's taxonomies.
///
/// Taxonomy terms are addressed as `taxonomies.<taxonomy_uid>` fields and
/// ride the generic operator map, so the usual membership and existence
/// operators apply.
pub struct TaxonomyQuery {
    stack: Stack,
    filter: FilterMap,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl TaxonomyQuery {
    pub(crate) fn new(stack: Stack) -> Self {
        Self {
            stack,
            filter: FilterMap::new(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    fn taxonomy_field(taxonomy_uid: &str) -> String {
        format!("taxonomies.{taxonomy_uid}")
    }

    /// Entries tagged with exactly this term.
    pub fn term_equals(&mut self, taxonomy_uid: &str, term: &str) -> &mut Self {
        self.filter
            .equals(&Self::taxonomy_field(taxonomy_uid), Value::String(term.to_string()));
        self
    }

    /// Entries tagged with any of the given terms.
    pub fn terms_in(&mut self, taxonomy_uid: &str, terms: &[&str]) -> &mut Self {
        let values = terms
            .iter()
            .map(|t| Value::String((*t).to_string()))
            .collect();
        self.filter
            .contained_in(&Self::taxonomy_field(taxonomy_uid), values);
        self
    }

    /// Entries classified under the taxonomy at all.
    pub fn taxonomy_exists(&mut self, taxonomy_uid: &str) -> &mut Self {
        self.filter.exists(&Self::taxonomy_field(taxonomy_uid), true);
        self
    }

    /// Caps the number of returned entries.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Skips the first `skip` matches.
    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.params.push(("skip".to_string(), skip.to_string()));
        self
    }

    /// Adds a call-scoped header for this query only.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Executes the query. Each entry binds to the content type named in
    /// its own document.
    pub async fn find(&self) -> DeliveryResult<Vec<Entry>> {
        let mut params = Vec::new();
        if !self.filter.is_empty() {
            params.push(("query".to_string(), self.filter.to_json_string()));
        }
        params.extend(self.params.iter().cloned());
        params.push((
            "environment".to_string(),
            self.stack.environment().to_string(),
        ));

        debug!("querying taxonomy entries");
        let body = self
            .stack
            .get("/v3/taxonomies/entries", &self.headers, &params)
            .await?;

        let entries = body
            .get("entries")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|doc| doc.is_object())
                    .map(|doc| {
                        let content_type = doc
                            .get("_content_type_uid")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        Entry::new(content_type, doc.clone())
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(entries)
    }
}
