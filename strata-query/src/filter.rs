//! Filter constraints as an explicit field → operator-map structure.
//!
//! Each field in the root object maps either to a scalar (equality) or to an
//! object keyed by operators (`$lt`, `$in`, `$exists`, …). Operators on the
//! same field share that one operand object: applying a different operator
//! adds a key, re-applying the same operator replaces its value, and an
//! equality write replaces the whole container. `$and` / `$or` live at the
//! root and hold snapshots of child filters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A comparison or membership operator on a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `$lt`
    LessThan,
    /// `$lte`
    LessThanOrEquals,
    /// `$gt`
    GreaterThan,
    /// `$gte`
    GreaterThanOrEquals,
    /// `$ne`
    NotEquals,
    /// `$in`
    In,
    /// `$nin`
    NotIn,
    /// `$exists`
    Exists,
    /// `$regex`
    Regex,
    /// `$options` (regex modifiers)
    Options,
    /// `$in_query` (embedded subquery, serialized as a string)
    InQuery,
    /// `$nin_query`
    NotInQuery,
}

impl Operator {
    /// The operator's wire key.
    pub fn key(self) -> &'static str {
        match self {
            Operator::LessThan => "$lt",
            Operator::LessThanOrEquals => "$lte",
            Operator::GreaterThan => "$gt",
            Operator::GreaterThanOrEquals => "$gte",
            Operator::NotEquals => "$ne",
            Operator::In => "$in",
            Operator::NotIn => "$nin",
            Operator::Exists => "$exists",
            Operator::Regex => "$regex",
            Operator::Options => "$options",
            Operator::InQuery => "$in_query",
            Operator::NotInQuery => "$nin_query",
        }
    }
}

/// Accumulated filter state for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterMap {
    root: Map<String, Value>,
}

impl FilterMap {
    /// Creates an empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an equality constraint, replacing any prior state for the field.
    pub fn equals(&mut self, field: &str, value: Value) {
        self.root.insert(field.to_string(), value);
    }

    /// Merges an operator constraint into the field's operand object.
    ///
    /// If the field currently holds an operator object, the operator key is
    /// written into it (same operator replaces, different operators
    /// accumulate). A scalar equality value or absent field is replaced by a
    /// fresh operand object.
    pub fn merge_op(&mut self, field: &str, op: Operator, value: Value) {
        match self.root.get_mut(field) {
            Some(Value::Object(operand)) => {
                operand.insert(op.key().to_string(), value);
            }
            _ => {
                let mut operand = Map::new();
                operand.insert(op.key().to_string(), value);
                self.root.insert(field.to_string(), Value::Object(operand));
            }
        }
    }

    /// Set-membership constraint; value order is preserved.
    pub fn contained_in(&mut self, field: &str, values: Vec<Value>) {
        self.merge_op(field, Operator::In, Value::Array(values));
    }

    /// Negated set-membership constraint.
    pub fn not_contained_in(&mut self, field: &str, values: Vec<Value>) {
        self.merge_op(field, Operator::NotIn, Value::Array(values));
    }

    /// Existence constraint.
    pub fn exists(&mut self, field: &str, present: bool) {
        self.merge_op(field, Operator::Exists, Value::Bool(present));
    }

    /// Regex constraint with optional modifiers.
    pub fn regex(&mut self, field: &str, pattern: &str, modifiers: Option<&str>) {
        self.merge_op(field, Operator::Regex, Value::String(pattern.to_string()));
        if let Some(mods) = modifiers {
            self.merge_op(field, Operator::Options, Value::String(mods.to_string()));
        }
    }

    /// Wraps child filter snapshots under `$and`. Empty children are
    /// skipped so an all-empty combination stays a match-all filter.
    pub fn and(&mut self, children: &[FilterMap]) {
        self.combine("$and", children);
    }

    /// Wraps child filter snapshots under `$or`.
    pub fn or(&mut self, children: &[FilterMap]) {
        self.combine("$or", children);
    }

    fn combine(&mut self, key: &str, children: &[FilterMap]) {
        let snapshots: Vec<Value> = children
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| Value::Object(c.root.clone()))
            .collect();
        if !snapshots.is_empty() {
            self.root.insert(key.to_string(), Value::Array(snapshots));
        }
    }

    /// Embeds a subquery's filter under `$in_query`.
    ///
    /// The subquery is embedded as its serialized JSON **string**, not as a
    /// nested object. That string-embedding is the wire contract with the
    /// delivery API.
    pub fn in_query(&mut self, field: &str, subquery: &FilterMap) {
        self.merge_op(field, Operator::InQuery, Value::String(subquery.to_json_string()));
    }

    /// Embeds a subquery's filter under `$nin_query` (string-embedded).
    pub fn not_in_query(&mut self, field: &str, subquery: &FilterMap) {
        self.merge_op(
            field,
            Operator::NotInQuery,
            Value::String(subquery.to_json_string()),
        );
    }

    /// Whether no constraints have been set.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The filter as a JSON object.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.root
    }

    /// The filter as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// The filter serialized for the `query` wire parameter.
    pub fn to_json_string(&self) -> String {
        // a Map<String, Value> cannot fail to serialize
        serde_json::to_string(&self.root).unwrap_or_else(|_| "{}".to_string())
    }
}
