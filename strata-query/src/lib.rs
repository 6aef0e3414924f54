//! Query DSL for the Strata delivery SDK.
//!
//! Entry queries accumulate state through fluent calls and serialize it into
//! the delivery API's wire format at execute time. The pieces:
//! - `FilterMap`: one constraint set per field, stored as an explicit
//!   field → operator-map structure
//! - `ProjectionSpec`: only/except field selection, base and
//!   reference-scoped, plus reference inclusion
//! - `QueryState`: the full accumulated builder state and its snapshot into
//!   an ordered wire parameter list
//!
//! This crate is pure data; execution lives in `strata-delivery`.

mod filter;
mod params;
mod projection;

pub use filter::{FilterMap, Operator};
pub use params::{QueryState, SortDirection};
pub use projection::ProjectionSpec;

/// Errors produced while building or serializing a query.
///
/// Builder methods never panic on bad arguments; the first invalid call is
/// recorded on the state and surfaced when the query executes, so failures
/// always travel the same channel as network results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A filter or projection argument was empty where a value is required.
    #[error("invalid query argument: {0}")]
    InvalidArgument(String),

    /// The query has no content type to execute against.
    #[error("content type uid must not be empty")]
    MissingContentType,
}
