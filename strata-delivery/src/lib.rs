//! Async client for the Strata content delivery API.
//!
//! Applications define a [`Stack`] (a content repository plus credentials),
//! address content types, entries, assets, and taxonomies within it, build
//! filtered queries against entries, and synchronize a local view of
//! published content incrementally over the delta feed.
//!
//! # Architecture
//!
//! - **Query construction** (`strata-query`): fluent builders accumulate
//!   filter/projection/pagination state and serialize it into the wire
//!   format once, at execute time.
//! - **Document views** (`strata-types`): lenient typed accessors and local
//!   reference resolution over fetched JSON.
//! - **Transport**: one narrow contract — execute a GET, get JSON or a
//!   structured error. Retry/backoff lives behind it.
//! - **Sync**: a token-driven, caller-paged delta feed. One GET per call;
//!   interrupted runs resume from a durable token.
//!
//! # Example
//!
//! ```no_run
//! use strata_delivery::{Stack, StackConfig};
//!
//! # async fn run() -> strata_delivery::DeliveryResult<()> {
//! let stack = Stack::new(StackConfig::new("api_key", "delivery_token", "production"))?;
//!
//! let mut query = stack.content_type("product").query();
//! query
//!     .greater_than("price", 10)
//!     .less_than("price", 100)
//!     .include_reference("brand")
//!     .order_by_descending("updated_at")
//!     .limit(20);
//!
//! let result = query.find().await?;
//! for entry in result.entries() {
//!     println!("{:?}", entry.title());
//! }
//! # Ok(()) }
//! ```

mod assets;
mod config;
mod content_type;
mod error;
mod query;
mod stack;
mod sync;
mod taxonomy;
pub mod transport;

pub use assets::{AssetFetcher, AssetLibrary};
pub use config::{LivePreviewConfig, Region, RetryPolicy, StackConfig};
pub use content_type::{ContentType, EntryFetcher};
pub use error::{DeliveryError, DeliveryResult};
pub use query::Query;
pub use stack::Stack;
pub use sync::{PublishType, SyncClient, SyncFilters};
pub use taxonomy::TaxonomyQuery;
pub use transport::{HttpTransport, Transport};

// Re-export the data model so applications need only this crate.
pub use strata_query::{FilterMap, ProjectionSpec, QueryError, QueryState, SortDirection};
pub use strata_types::{
    format_sync_timestamp, parse_iso8601, Asset, AssetList, Entry, Group, QueryResult, SyncItem,
    SyncPage,
};
