//! Document views and response types for the Strata delivery SDK.
//!
//! This crate defines the read-side data model shared by the query and sync
//! layers:
//! - `Entry`, `Asset`, and `Group` views over fetched JSON documents
//! - Local reference resolution (nested groups, referenced entries)
//! - Response pages (`QueryResult`, `SyncPage`)
//! - ISO-8601 date handling for entry timestamps and sync checkpoints
//!
//! Everything here is a synchronous, lossless projection over already-fetched
//! data. Nothing in this crate performs I/O; network concerns live in
//! `strata-delivery`.

mod asset;
mod date;
mod document;
mod entry;
mod group;
mod page;

pub use asset::Asset;
pub use date::{format_sync_timestamp, parse_iso8601};
pub use entry::Entry;
pub use group::Group;
pub use page::{AssetList, QueryResult, SyncItem, SyncPage};
