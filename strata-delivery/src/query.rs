//! Executable entry queries.
//!
//! `Query` couples accumulated [`QueryState`] with a stack and a content
//! type. Configuration calls mutate in place; execution takes an immutable
//! snapshot of the state, so builders stay reusable and `find_one` never
//! leaves a mutation window behind.

use crate::error::{DeliveryError, DeliveryResult};
use crate::stack::Stack;
use serde_json::Value;
use strata_query::QueryState;
use strata_types::{Entry, QueryResult};
use tracing::debug;

/// A filtered query over one content type's entries.
pub struct Query {
    stack: Stack,
    state: QueryState,
    headers: Vec<(String, String)>,
}

impl Query {
    pub(crate) fn new(stack: Stack, content_type_uid: impl Into<String>) -> Self {
        Self {
            stack,
            state: QueryState::new(content_type_uid),
            headers: Vec::new(),
        }
    }

    /// The accumulated query state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Mutable access to the accumulated state, for the full DSL surface.
    ///
    /// The common operations are mirrored as methods on `Query`; anything
    /// else (regex modifiers, feature toggles, raw params) is reachable
    /// here.
    pub fn state_mut(&mut self) -> &mut QueryState {
        &mut self.state
    }

    // ── Filters ─────────────────────────────────────────────────────

    /// Equality constraint; replaces any prior state for the field.
    pub fn where_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.where_equals(field, value);
        self
    }

    /// `$lt` constraint.
    pub fn less_than(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.less_than(field, value);
        self
    }

    /// `$lte` constraint.
    pub fn less_than_or_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.less_than_or_equals(field, value);
        self
    }

    /// `$gt` constraint.
    pub fn greater_than(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.greater_than(field, value);
        self
    }

    /// `$gte` constraint.
    pub fn greater_than_or_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.greater_than_or_equals(field, value);
        self
    }

    /// `$ne` constraint.
    pub fn not_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.state.not_equals(field, value);
        self
    }

    /// `$in` constraint; value order is preserved.
    pub fn contained_in(&mut self, field: &str, values: Vec<Value>) -> &mut Self {
        self.state.contained_in(field, values);
        self
    }

    /// `$nin` constraint.
    pub fn not_contained_in(&mut self, field: &str, values: Vec<Value>) -> &mut Self {
        self.state.not_contained_in(field, values);
        self
    }

    /// `$exists: true` constraint.
    pub fn exists(&mut self, field: &str) -> &mut Self {
        self.state.exists(field);
        self
    }

    /// `$exists: false` constraint.
    pub fn not_exists(&mut self, field: &str) -> &mut Self {
        self.state.not_exists(field);
        self
    }

    /// `$regex` constraint.
    pub fn regex(&mut self, field: &str, pattern: &str) -> &mut Self {
        self.state.regex(field, pattern);
        self
    }

    /// Combines other queries' filters under `$and`. Only filter state
    /// participates.
    pub fn and(&mut self, others: &[Query]) -> &mut Self {
        let states: Vec<QueryState> = others.iter().map(|q| q.state.clone()).collect();
        self.state.and(&states);
        self
    }

    /// Combines other queries' filters under `$or`.
    pub fn or(&mut self, others: &[Query]) -> &mut Self {
        let states: Vec<QueryState> = others.iter().map(|q| q.state.clone()).collect();
        self.state.or(&states);
        self
    }

    /// Matches entries whose reference field points at entries matched by
    /// the subquery (string-embedded `$in_query`).
    pub fn where_in(&mut self, field: &str, subquery: &Query) -> &mut Self {
        self.state.where_in(field, &subquery.state);
        self
    }

    /// Negated form of [`where_in`](Self::where_in).
    pub fn where_not_in(&mut self, field: &str, subquery: &Query) -> &mut Self {
        self.state.where_not_in(field, &subquery.state);
        self
    }

    // ── Projection, sort, pagination ────────────────────────────────

    /// Restricts the response to the given base fields.
    pub fn only<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.only(fields);
        self
    }

    /// Drops the given base fields from the response.
    pub fn except<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.except(fields);
        self
    }

    /// Restricts a referenced entry's fields, implicitly including the
    /// reference.
    pub fn only_with_reference<I, S>(&mut self, fields: I, reference: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.only_with_reference(fields, reference);
        self
    }

    /// Drops a referenced entry's fields, implicitly including the
    /// reference.
    pub fn except_with_reference<I, S>(&mut self, fields: I, reference: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.except_with_reference(fields, reference);
        self
    }

    /// Resolves a reference field server-side.
    pub fn include_reference(&mut self, reference: &str) -> &mut Self {
        self.state.include_reference(reference);
        self
    }

    /// Sorts ascending by a field; replaces any active sort key.
    pub fn order_by_ascending(&mut self, field: &str) -> &mut Self {
        self.state.order_by_ascending(field);
        self
    }

    /// Sorts descending by a field; replaces any active sort key.
    pub fn order_by_descending(&mut self, field: &str) -> &mut Self {
        self.state.order_by_descending(field);
        self
    }

    /// Caps the number of returned entries.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.state.limit(limit);
        self
    }

    /// Skips the first `skip` matches.
    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.state.skip(skip);
        self
    }

    /// Requests entries in a specific locale.
    pub fn locale(&mut self, locale: &str) -> &mut Self {
        self.state.locale(locale);
        self
    }

    /// Asks the response to carry the total match count.
    pub fn include_count(&mut self) -> &mut Self {
        self.state.include_count();
        self
    }

    /// Asks the response to carry the content type schema.
    pub fn include_content_type(&mut self) -> &mut Self {
        self.state.include_content_type();
        self
    }

    /// Falls back to the default locale for untranslated entries.
    pub fn include_fallback(&mut self) -> &mut Self {
        self.state.include_fallback();
        self
    }

    /// Asks the response to carry global field schemas.
    pub fn include_global_field_schema(&mut self) -> &mut Self {
        self.state.include_global_field_schema();
        self
    }

    /// Resolves embedded items in rich-text fields.
    pub fn include_embedded_items(&mut self) -> &mut Self {
        self.state.include_embedded_items();
        self
    }

    /// Annotates resolved references with their content type uid.
    pub fn include_reference_content_type_uid(&mut self) -> &mut Self {
        self.state.include_reference_content_type_uid();
        self
    }

    /// Adds a call-scoped header; overrides the stack-level value for the
    /// same key on this query only.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Opaque key/value parameter, merged last on the wire.
    pub fn add_param(&mut self, key: &str, value: &str) -> &mut Self {
        self.state.add_param(key, value);
        self
    }

    // ── Execution ───────────────────────────────────────────────────

    fn entries_path(&self) -> String {
        format!(
            "/v3/content_types/{}/entries",
            urlencoding::encode(self.state.content_type_uid())
        )
    }

    async fn execute(&self, state: &QueryState) -> DeliveryResult<Value> {
        state.validate()?;

        let mut params = state.to_params();
        params.push((
            "environment".to_string(),
            self.stack.environment().to_string(),
        ));

        debug!(
            "querying entries for content type {}",
            state.content_type_uid()
        );
        self.stack
            .get(&self.entries_path(), &self.headers, &params)
            .await
    }

    /// Executes the query and folds the response into a [`QueryResult`].
    pub async fn find(&self) -> DeliveryResult<QueryResult> {
        let body = self.execute(&self.state).await?;
        Ok(QueryResult::from_response(
            self.state.content_type_uid(),
            &body,
        ))
    }

    /// Executes the query capped at one entry and returns it.
    ///
    /// The limit override applies to an execution snapshot only; the
    /// builder's own limit is untouched and later `find` calls use it.
    pub async fn find_one(&self) -> DeliveryResult<Entry> {
        let mut snapshot = self.state.clone();
        snapshot.set_limit(1);

        let body = self.execute(&snapshot).await?;
        QueryResult::from_response(self.state.content_type_uid(), &body)
            .into_entries()
            .into_iter()
            .next()
            .ok_or_else(|| DeliveryError::not_found("no entries matched the query"))
    }

    /// Executes a count-only variant and returns the match count.
    pub async fn count(&self) -> DeliveryResult<u64> {
        let mut snapshot = self.state.clone();
        snapshot.count_only();

        let body = self.execute(&snapshot).await?;
        // count-only responses put the number under `entries`
        Ok(body
            .get("entries")
            .and_then(Value::as_u64)
            .or_else(|| body.get("count").and_then(Value::as_u64))
            .unwrap_or(0))
    }
}
