//! The stack: credential scope and entry point for all delivery reads.

use crate::assets::{AssetFetcher, AssetLibrary};
use crate::config::StackConfig;
use crate::content_type::ContentType;
use crate::error::{DeliveryError, DeliveryResult};
use crate::sync::SyncClient;
use crate::taxonomy::TaxonomyQuery;
use crate::transport::{HttpTransport, Transport};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A handle to one stack (content repository).
///
/// Cloning is cheap; clones share the underlying transport. A stack is the
/// factory for content types, asset fetchers, sync sessions, and taxonomy
/// queries, and owns header assembly for all of them.
#[derive(Clone)]
pub struct Stack {
    config: Arc<StackConfig>,
    transport: Arc<dyn Transport>,
}

impl Stack {
    /// Creates a stack with a reqwest-backed transport.
    ///
    /// Fails with a configuration error when any required credential is
    /// empty; no network call is attempted.
    pub fn new(config: StackConfig) -> DeliveryResult<Self> {
        let transport = Arc::new(HttpTransport::new(
            Duration::from_secs(config.timeout_secs),
            config.retry,
        ));
        Self::with_transport(config, transport)
    }

    /// Creates a stack over an explicit transport. Used by tests and by
    /// applications that bring their own HTTP layer.
    pub fn with_transport(
        config: StackConfig,
        transport: Arc<dyn Transport>,
    ) -> DeliveryResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "stack api_key must not be empty".to_string(),
            ));
        }
        if config.delivery_token.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "stack delivery_token must not be empty".to_string(),
            ));
        }
        if config.environment.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "stack environment must not be empty".to_string(),
            ));
        }

        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// The stack's configuration.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Addresses a content type within the stack.
    pub fn content_type(&self, uid: impl Into<String>) -> ContentType {
        ContentType::new(self.clone(), uid)
    }

    /// Fetches all content type schemas in the stack.
    pub async fn content_types(&self) -> DeliveryResult<Vec<Value>> {
        let body = self.get("/v3/content_types", &[], &[]).await?;
        Ok(body
            .get("content_types")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Addresses a single asset by uid.
    pub fn asset(&self, uid: impl Into<String>) -> AssetFetcher {
        AssetFetcher::new(self.clone(), uid)
    }

    /// Addresses the stack's asset library.
    pub fn assets(&self) -> AssetLibrary {
        AssetLibrary::new(self.clone())
    }

    /// Opens a sync session over the stack's delta feed.
    pub fn sync(&self) -> SyncClient {
        SyncClient::new(self.clone())
    }

    /// Starts a taxonomy-wide entry query.
    pub fn taxonomies(&self) -> TaxonomyQuery {
        TaxonomyQuery::new(self.clone())
    }

    /// The environment this stack reads from.
    pub(crate) fn environment(&self) -> &str {
        &self.config.environment
    }

    /// Assembles request headers: stack-level credentials first, then
    /// call-scoped overrides. A call-scoped header always wins over the
    /// stack-level value for the same key, never the reverse.
    pub(crate) fn headers(&self, call_headers: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> =
            vec![("api_key".to_string(), self.config.api_key.clone())];

        match &self.config.live_preview {
            // preview swaps access_token/environment for live_preview/authorization
            Some(preview) if preview.is_active() => {
                if let Some(hash) = &preview.hash {
                    headers.push(("live_preview".to_string(), hash.clone()));
                }
                headers.push(("authorization".to_string(), preview.preview_token.clone()));
            }
            _ => {
                headers.push((
                    "access_token".to_string(),
                    self.config.delivery_token.clone(),
                ));
                headers.push(("environment".to_string(), self.config.environment.clone()));
            }
        }

        if let Some(branch) = &self.config.branch {
            headers.push(("branch".to_string(), branch.clone()));
        }

        for (key, value) in call_headers {
            match headers.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => headers.push((key.clone(), value.clone())),
            }
        }

        headers
    }

    /// Issues one GET against the delivery host.
    pub(crate) async fn get(
        &self,
        path: &str,
        call_headers: &[(String, String)],
        params: &[(String, String)],
    ) -> DeliveryResult<Value> {
        let url = format!("{}{}", self.config.delivery_base_url(), path);
        let headers = self.headers(call_headers);
        debug!("stack request: {}", path);
        self.transport.get(&url, &headers, params).await
    }
}
