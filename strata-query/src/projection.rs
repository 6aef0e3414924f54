//! Field projection: only/except selection and reference inclusion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accumulated projection state for one query.
///
/// All accumulators are additive and order-preserving; repeated calls union
/// rather than replace. Scoping a projection to a reference field implicitly
/// registers that reference for inclusion, since a reference must be fetched
/// before it can be projected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSpec {
    only: Vec<String>,
    except: Vec<String>,
    only_by_reference: Vec<(String, Vec<String>)>,
    except_by_reference: Vec<(String, Vec<String>)>,
    include: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn push_scoped(map: &mut Vec<(String, Vec<String>)>, reference: &str, fields: &[String]) {
    if let Some((_, existing)) = map.iter_mut().find(|(r, _)| r == reference) {
        for field in fields {
            push_unique(existing, field);
        }
    } else {
        let mut deduped = Vec::new();
        for field in fields {
            push_unique(&mut deduped, field);
        }
        map.push((reference.to_string(), deduped));
    }
}

impl ProjectionSpec {
    /// Creates an empty projection (all fields).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the response to the given base fields (union).
    pub fn only(&mut self, fields: &[String]) {
        for field in fields {
            push_unique(&mut self.only, field);
        }
    }

    /// Drops the given base fields from the response (union).
    pub fn except(&mut self, fields: &[String]) {
        for field in fields {
            push_unique(&mut self.except, field);
        }
    }

    /// Restricts a referenced entry's fields; registers the reference for
    /// inclusion as a side effect.
    pub fn only_with_reference(&mut self, fields: &[String], reference: &str) {
        push_scoped(&mut self.only_by_reference, reference, fields);
        self.include_reference(reference);
    }

    /// Drops fields from a referenced entry; registers the reference for
    /// inclusion as a side effect.
    pub fn except_with_reference(&mut self, fields: &[String], reference: &str) {
        push_scoped(&mut self.except_by_reference, reference, fields);
        self.include_reference(reference);
    }

    /// Requests that a reference field be resolved server-side. Duplicates
    /// are harmless.
    pub fn include_reference(&mut self, reference: &str) {
        push_unique(&mut self.include, reference);
    }

    /// Base `only` fields, in registration order.
    pub fn only_fields(&self) -> &[String] {
        &self.only
    }

    /// Base `except` fields, in registration order.
    pub fn except_fields(&self) -> &[String] {
        &self.except
    }

    /// References registered for inclusion, in registration order.
    pub fn includes(&self) -> &[String] {
        &self.include
    }

    /// The reference-scoped `only` projections as a JSON object, or `None`
    /// when no scoped projection is set.
    pub fn only_by_reference_object(&self) -> Option<Value> {
        scoped_object(&self.only_by_reference)
    }

    /// The reference-scoped `except` projections as a JSON object.
    pub fn except_by_reference_object(&self) -> Option<Value> {
        scoped_object(&self.except_by_reference)
    }
}

fn scoped_object(map: &[(String, Vec<String>)]) -> Option<Value> {
    if map.is_empty() {
        return None;
    }
    let mut object = Map::new();
    for (reference, fields) in map {
        object.insert(
            reference.clone(),
            Value::Array(fields.iter().cloned().map(Value::String).collect()),
        );
    }
    Some(Value::Object(object))
}
