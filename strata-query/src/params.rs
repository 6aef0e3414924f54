//! Accumulated query state and its wire-parameter snapshot.
//!
//! Fluent calls mutate a `QueryState`; execution takes an immutable snapshot
//! via `to_params`, so no request ever observes a half-mutated builder and
//! the builder remains reusable afterwards.

use crate::filter::{FilterMap, Operator};
use crate::projection::ProjectionSpec;
use crate::QueryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for the single active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Serialized as the `asc` parameter.
    Ascending,
    /// Serialized as the `desc` parameter.
    Descending,
}

/// The full accumulated state of one entry query.
///
/// Chained configuration calls apply in call order: last scalar write for a
/// field/operator wins, set-accumulating calls append. The first invalid
/// argument is recorded and surfaced at execute time instead of panicking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    content_type_uid: String,
    filter: FilterMap,
    projection: ProjectionSpec,
    sort: Option<(String, SortDirection)>,
    limit: Option<u64>,
    skip: Option<u64>,
    locale: Option<String>,
    include_count: bool,
    count_only: bool,
    include_content_type: bool,
    include_global_field_schema: bool,
    include_fallback: bool,
    include_embedded_items: bool,
    include_reference_content_type_uid: bool,
    raw_params: Vec<(String, String)>,
    deferred_error: Option<QueryError>,
}

impl QueryState {
    /// Creates query state for a content type.
    pub fn new(content_type_uid: impl Into<String>) -> Self {
        Self {
            content_type_uid: content_type_uid.into(),
            ..Self::default()
        }
    }

    /// The content type this query targets.
    pub fn content_type_uid(&self) -> &str {
        &self.content_type_uid
    }

    fn defer(&mut self, message: &str) {
        if self.deferred_error.is_none() {
            self.deferred_error = Some(QueryError::InvalidArgument(message.to_string()));
        }
    }

    fn valid_field(&mut self, field: &str, method: &str) -> bool {
        if field.trim().is_empty() {
            self.defer(&format!("{method} requires a non-empty field name"));
            return false;
        }
        true
    }

    /// Validates the state for execution. Returns the first deferred
    /// argument error, or `MissingContentType` when the uid is empty.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.content_type_uid.trim().is_empty() {
            return Err(QueryError::MissingContentType);
        }
        match &self.deferred_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // ── Filters ─────────────────────────────────────────────────────

    /// Equality constraint; replaces any prior state for the field.
    pub fn where_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        if self.valid_field(field, "where_equals") {
            self.filter.equals(field, value.into());
        }
        self
    }

    /// `$lt` constraint.
    pub fn less_than(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.comparison(field, Operator::LessThan, value.into(), "less_than")
    }

    /// `$lte` constraint.
    pub fn less_than_or_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.comparison(field, Operator::LessThanOrEquals, value.into(), "less_than_or_equals")
    }

    /// `$gt` constraint.
    pub fn greater_than(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.comparison(field, Operator::GreaterThan, value.into(), "greater_than")
    }

    /// `$gte` constraint.
    pub fn greater_than_or_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.comparison(
            field,
            Operator::GreaterThanOrEquals,
            value.into(),
            "greater_than_or_equals",
        )
    }

    /// `$ne` constraint.
    pub fn not_equals(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.comparison(field, Operator::NotEquals, value.into(), "not_equals")
    }

    fn comparison(&mut self, field: &str, op: Operator, value: Value, method: &str) -> &mut Self {
        if self.valid_field(field, method) {
            self.filter.merge_op(field, op, value);
        }
        self
    }

    /// `$in` constraint; value order is preserved on the wire.
    pub fn contained_in(&mut self, field: &str, values: Vec<Value>) -> &mut Self {
        if self.valid_field(field, "contained_in") {
            self.filter.contained_in(field, values);
        }
        self
    }

    /// `$nin` constraint.
    pub fn not_contained_in(&mut self, field: &str, values: Vec<Value>) -> &mut Self {
        if self.valid_field(field, "not_contained_in") {
            self.filter.not_contained_in(field, values);
        }
        self
    }

    /// `$exists: true` constraint.
    pub fn exists(&mut self, field: &str) -> &mut Self {
        if self.valid_field(field, "exists") {
            self.filter.exists(field, true);
        }
        self
    }

    /// `$exists: false` constraint.
    pub fn not_exists(&mut self, field: &str) -> &mut Self {
        if self.valid_field(field, "not_exists") {
            self.filter.exists(field, false);
        }
        self
    }

    /// `$regex` constraint.
    pub fn regex(&mut self, field: &str, pattern: &str) -> &mut Self {
        if self.valid_field(field, "regex") {
            self.filter.regex(field, pattern, None);
        }
        self
    }

    /// `$regex` constraint with modifiers (`$options`).
    pub fn regex_with_modifiers(&mut self, field: &str, pattern: &str, modifiers: &str) -> &mut Self {
        if self.valid_field(field, "regex_with_modifiers") {
            self.filter.regex(field, pattern, Some(modifiers));
        }
        self
    }

    /// Combines child queries' filter snapshots under `$and`. Only filter
    /// state participates; child projection and pagination are ignored.
    pub fn and(&mut self, children: &[QueryState]) -> &mut Self {
        let filters: Vec<FilterMap> = children.iter().map(|c| c.filter.clone()).collect();
        self.filter.and(&filters);
        self
    }

    /// Combines child queries' filter snapshots under `$or`.
    pub fn or(&mut self, children: &[QueryState]) -> &mut Self {
        let filters: Vec<FilterMap> = children.iter().map(|c| c.filter.clone()).collect();
        self.filter.or(&filters);
        self
    }

    /// Matches entries whose `field` references entries matched by the
    /// subquery. The subquery's filter is string-embedded under `$in_query`.
    pub fn where_in(&mut self, field: &str, subquery: &QueryState) -> &mut Self {
        if self.valid_field(field, "where_in") {
            self.filter.in_query(field, &subquery.filter);
        }
        self
    }

    /// Negated form of [`where_in`](Self::where_in) (`$nin_query`).
    pub fn where_not_in(&mut self, field: &str, subquery: &QueryState) -> &mut Self {
        if self.valid_field(field, "where_not_in") {
            self.filter.not_in_query(field, &subquery.filter);
        }
        self
    }

    // ── Projection ──────────────────────────────────────────────────

    /// Restricts the response to the given base fields (union).
    pub fn only<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.projection.only(&fields);
        self
    }

    /// Drops the given base fields from the response (union).
    pub fn except<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.projection.except(&fields);
        self
    }

    /// Restricts a referenced entry's fields, implicitly including the
    /// reference.
    pub fn only_with_reference<I, S>(&mut self, fields: I, reference: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.valid_field(reference, "only_with_reference") {
            let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
            self.projection.only_with_reference(&fields, reference);
        }
        self
    }

    /// Drops fields from a referenced entry, implicitly including the
    /// reference.
    pub fn except_with_reference<I, S>(&mut self, fields: I, reference: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.valid_field(reference, "except_with_reference") {
            let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
            self.projection.except_with_reference(&fields, reference);
        }
        self
    }

    /// Resolves a reference field server-side.
    pub fn include_reference(&mut self, reference: &str) -> &mut Self {
        if self.valid_field(reference, "include_reference") {
            self.projection.include_reference(reference);
        }
        self
    }

    // ── Sort, pagination, locale ────────────────────────────────────

    /// Sorts ascending by a field. Replaces any active sort key.
    pub fn order_by_ascending(&mut self, field: &str) -> &mut Self {
        if self.valid_field(field, "order_by_ascending") {
            self.sort = Some((field.to_string(), SortDirection::Ascending));
        }
        self
    }

    /// Sorts descending by a field. Replaces any active sort key.
    pub fn order_by_descending(&mut self, field: &str) -> &mut Self {
        if self.valid_field(field, "order_by_descending") {
            self.sort = Some((field.to_string(), SortDirection::Descending));
        }
        self
    }

    /// Caps the number of returned entries.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `skip` matches.
    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.skip = Some(skip);
        self
    }

    /// The currently set limit, if any.
    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Overrides the limit in place. Used for single-result snapshots.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    /// Requests entries in a specific locale.
    pub fn locale(&mut self, locale: &str) -> &mut Self {
        self.locale = Some(locale.to_string());
        self
    }

    // ── Feature toggles ─────────────────────────────────────────────

    /// Asks the response to carry the total match count.
    pub fn include_count(&mut self) -> &mut Self {
        self.include_count = true;
        self
    }

    /// Asks for the count alone, without entry bodies.
    pub fn count_only(&mut self) -> &mut Self {
        self.count_only = true;
        self
    }

    /// Asks the response to carry the content type schema.
    pub fn include_content_type(&mut self) -> &mut Self {
        self.include_content_type = true;
        self
    }

    /// Asks the response to carry global field schemas.
    pub fn include_global_field_schema(&mut self) -> &mut Self {
        self.include_global_field_schema = true;
        self
    }

    /// Falls back to the default locale for untranslated entries.
    pub fn include_fallback(&mut self) -> &mut Self {
        self.include_fallback = true;
        self
    }

    /// Resolves embedded items in rich-text fields.
    pub fn include_embedded_items(&mut self) -> &mut Self {
        self.include_embedded_items = true;
        self
    }

    /// Annotates resolved references with their content type uid.
    pub fn include_reference_content_type_uid(&mut self) -> &mut Self {
        self.include_reference_content_type_uid = true;
        self
    }

    /// Opaque key/value escape hatch, merged last on the wire.
    pub fn add_param(&mut self, key: &str, value: &str) -> &mut Self {
        if self.valid_field(key, "add_param") {
            self.raw_params.push((key.to_string(), value.to_string()));
        }
        self
    }

    // ── Serialization ───────────────────────────────────────────────

    /// Snapshots the accumulated state into the wire parameter list.
    ///
    /// Repeatable keys (`only[BASE][]`, `include[]`, …) appear once per
    /// value. An empty filter emits no `query` parameter at all, so an
    /// unfiltered query matches everything. Raw params are merged last.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.filter.is_empty() {
            params.push(("query".to_string(), self.filter.to_json_string()));
        }

        for field in self.projection.only_fields() {
            params.push(("only[BASE][]".to_string(), field.clone()));
        }
        for field in self.projection.except_fields() {
            params.push(("except[BASE][]".to_string(), field.clone()));
        }
        if let Some(scoped) = self.projection.only_by_reference_object() {
            params.push(("only".to_string(), scoped.to_string()));
        }
        if let Some(scoped) = self.projection.except_by_reference_object() {
            params.push(("except".to_string(), scoped.to_string()));
        }
        for reference in self.projection.includes() {
            params.push(("include[]".to_string(), reference.clone()));
        }

        if let Some((field, direction)) = &self.sort {
            let key = match direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            };
            params.push((key.to_string(), field.clone()));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(locale) = &self.locale {
            params.push(("locale".to_string(), locale.clone()));
        }

        if self.include_count {
            params.push(("include_count".to_string(), "true".to_string()));
        }
        if self.count_only {
            params.push(("count".to_string(), "true".to_string()));
        }
        if self.include_content_type {
            params.push(("include_content_type".to_string(), "true".to_string()));
        }
        if self.include_global_field_schema {
            params.push(("include_global_field_schema".to_string(), "true".to_string()));
        }
        if self.include_fallback {
            params.push(("include_fallback".to_string(), "true".to_string()));
        }
        if self.include_embedded_items {
            params.push(("include_embedded_items[]".to_string(), "BASE".to_string()));
        }
        if self.include_reference_content_type_uid {
            params.push((
                "include_reference_content_type_uid".to_string(),
                "true".to_string(),
            ));
        }

        for (key, value) in &self.raw_params {
            params.push((key.clone(), value.clone()));
        }

        params
    }
}
