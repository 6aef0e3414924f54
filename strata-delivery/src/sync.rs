//! Incremental sync over the stack's delta feed.
//!
//! The feed is paginated and token-driven. Every call here issues exactly
//! one GET and returns that single page; the client never auto-loops.
//! Resumability is the point: a caller that stops mid-feed holds a durable
//! `pagination_token`, a caller that drained the feed holds a `sync_token`
//! checkpoint, and either token restarts from where it left off.
//!
//! ```no_run
//! # async fn run(stack: strata_delivery::Stack) -> strata_delivery::DeliveryResult<()> {
//! let sync = stack.sync();
//! let mut page = sync.init().await?;
//! while let Some(token) = page.pagination_token().map(str::to_string) {
//!     page = sync.with_pagination_token(&token).await?;
//! }
//! let checkpoint = page.sync_token(); // persist for the next run
//! # Ok(()) }
//! ```

use crate::error::{DeliveryError, DeliveryResult};
use crate::stack::Stack;
use chrono::{DateTime, Utc};
use strata_types::{format_sync_timestamp, SyncPage};
use tracing::debug;

const SYNC_PATH: &str = "/v3/stacks/sync";

/// The delta feed's item classes, used to filter an initial sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishType {
    /// Entries published since the checkpoint.
    EntryPublished,
    /// Entries unpublished since the checkpoint.
    EntryUnpublished,
    /// Entries deleted since the checkpoint.
    EntryDeleted,
    /// Assets published since the checkpoint.
    AssetPublished,
    /// Assets unpublished since the checkpoint.
    AssetUnpublished,
    /// Assets deleted since the checkpoint.
    AssetDeleted,
    /// Content types deleted since the checkpoint.
    ContentTypeDeleted,
}

impl PublishType {
    /// The wire value for the `type` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            PublishType::EntryPublished => "entry_published",
            PublishType::EntryUnpublished => "entry_unpublished",
            PublishType::EntryDeleted => "entry_deleted",
            PublishType::AssetPublished => "asset_published",
            PublishType::AssetUnpublished => "asset_unpublished",
            PublishType::AssetDeleted => "asset_deleted",
            PublishType::ContentTypeDeleted => "content_type_deleted",
        }
    }
}

/// Filters for an initial sync call.
///
/// This struct is the combined form: it is the only way to set several
/// filters on one call. The single-filter constructors cover the common
/// cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncFilters {
    content_type_uid: Option<String>,
    locale: Option<String>,
    publish_type: Option<PublishType>,
    start_from: Option<DateTime<Utc>>,
}

impl SyncFilters {
    /// No filters: the full feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only items of one content type.
    pub fn content_type(uid: impl Into<String>) -> Self {
        Self::new().with_content_type(uid)
    }

    /// Only items in one locale.
    pub fn locale(locale: impl Into<String>) -> Self {
        Self::new().with_locale(locale)
    }

    /// Only items of one publish class.
    pub fn publish_type(publish_type: PublishType) -> Self {
        Self::new().with_publish_type(publish_type)
    }

    /// Only items changed at or after a moment in time.
    pub fn from_date(start: DateTime<Utc>) -> Self {
        Self::new().with_start_from(start)
    }

    /// Sets the content type filter.
    pub fn with_content_type(mut self, uid: impl Into<String>) -> Self {
        self.content_type_uid = Some(uid.into());
        self
    }

    /// Sets the locale filter.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the publish type filter.
    pub fn with_publish_type(mut self, publish_type: PublishType) -> Self {
        self.publish_type = Some(publish_type);
        self
    }

    /// Sets the start date filter.
    pub fn with_start_from(mut self, start: DateTime<Utc>) -> Self {
        self.start_from = Some(start);
        self
    }

    fn append_params(&self, params: &mut Vec<(String, String)>) {
        if let Some(uid) = &self.content_type_uid {
            params.push(("content_type_uid".to_string(), uid.clone()));
        }
        if let Some(locale) = &self.locale {
            params.push(("locale".to_string(), locale.clone()));
        }
        if let Some(publish_type) = self.publish_type {
            params.push(("type".to_string(), publish_type.as_str().to_string()));
        }
        if let Some(start) = self.start_from {
            params.push(("start_from".to_string(), format_sync_timestamp(start)));
        }
    }
}

/// A sync session over one stack.
///
/// The three entry points — init, sync-token resume, pagination-token
/// resume — are mutually exclusive per call.
pub struct SyncClient {
    stack: Stack,
    headers: Vec<(String, String)>,
}

impl SyncClient {
    pub(crate) fn new(stack: Stack) -> Self {
        Self {
            stack,
            headers: Vec::new(),
        }
    }

    /// Adds a call-scoped header applied to every page request from this
    /// client.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    async fn page(&self, params: Vec<(String, String)>) -> DeliveryResult<SyncPage> {
        let body = self.stack.get(SYNC_PATH, &self.headers, &params).await?;
        let page = SyncPage::from_response(&body);
        debug!(
            "sync page: {} items, more={}",
            page.items().len(),
            page.has_more()
        );
        Ok(page)
    }

    /// Full initial sync, no filters. Returns the first page.
    pub async fn init(&self) -> DeliveryResult<SyncPage> {
        self.init_with(&SyncFilters::new()).await
    }

    /// Initial sync restricted by the given filters.
    pub async fn init_with(&self, filters: &SyncFilters) -> DeliveryResult<SyncPage> {
        let mut params = vec![("init".to_string(), "true".to_string())];
        filters.append_params(&mut params);
        self.page(params).await
    }

    /// Initial sync of one content type.
    pub async fn init_for_content_type(&self, uid: &str) -> DeliveryResult<SyncPage> {
        self.init_with(&SyncFilters::content_type(uid)).await
    }

    /// Initial sync of one locale.
    pub async fn init_for_locale(&self, locale: &str) -> DeliveryResult<SyncPage> {
        self.init_with(&SyncFilters::locale(locale)).await
    }

    /// Initial sync of one publish class.
    pub async fn init_for_publish_type(
        &self,
        publish_type: PublishType,
    ) -> DeliveryResult<SyncPage> {
        self.init_with(&SyncFilters::publish_type(publish_type)).await
    }

    /// Initial sync of changes at or after a moment in time.
    pub async fn init_from_date(&self, start: DateTime<Utc>) -> DeliveryResult<SyncPage> {
        self.init_with(&SyncFilters::from_date(start)).await
    }

    /// Resumes incremental sync from a stored checkpoint. Sends the token
    /// alone; this is not an init call.
    pub async fn with_sync_token(&self, token: &str) -> DeliveryResult<SyncPage> {
        if token.trim().is_empty() {
            return Err(DeliveryError::Validation(
                "sync token must not be empty".to_string(),
            ));
        }
        self.page(vec![("sync_token".to_string(), token.to_string())])
            .await
    }

    /// Resumes an interrupted multi-page run mid-feed.
    ///
    /// Pagination resumption is itself a fresh init call scoped by the
    /// token on the wire, so `init=true` rides along. That is the remote
    /// contract; do not "fix" it.
    pub async fn with_pagination_token(&self, token: &str) -> DeliveryResult<SyncPage> {
        if token.trim().is_empty() {
            return Err(DeliveryError::Validation(
                "pagination token must not be empty".to_string(),
            ));
        }
        self.page(vec![
            ("init".to_string(), "true".to_string()),
            ("pagination_token".to_string(), token.to_string()),
        ])
        .await
    }
}
