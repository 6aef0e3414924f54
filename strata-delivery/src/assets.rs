//! Asset fetching: single assets and the asset library.

use crate::error::{DeliveryError, DeliveryResult};
use crate::stack::Stack;
use serde_json::Value;
use strata_types::{Asset, AssetList};
use tracing::debug;

/// Fetches one asset's metadata document by uid.
pub struct AssetFetcher {
    stack: Stack,
    uid: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl AssetFetcher {
    pub(crate) fn new(stack: Stack, uid: impl Into<String>) -> Self {
        Self {
            stack,
            uid: uid.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// The asset's uid.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Falls back to the default locale when untranslated.
    pub fn include_fallback(&mut self) -> &mut Self {
        self.params
            .push(("include_fallback".to_string(), "true".to_string()));
        self
    }

    /// Asks for image dimension metadata.
    pub fn include_dimension(&mut self) -> &mut Self {
        self.params
            .push(("include_dimension".to_string(), "true".to_string()));
        self
    }

    /// Adds a call-scoped header for this fetch only.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Fetches the asset.
    pub async fn fetch(&self) -> DeliveryResult<Asset> {
        if self.uid.trim().is_empty() {
            return Err(DeliveryError::Configuration(
                "asset uid must not be empty".to_string(),
            ));
        }

        let path = format!("/v3/assets/{}", urlencoding::encode(&self.uid));
        let mut params = self.params.clone();
        params.push((
            "environment".to_string(),
            self.stack.environment().to_string(),
        ));

        debug!("fetching asset {}", self.uid);
        let body = self.stack.get(&path, &self.headers, &params).await?;

        body.get("asset")
            .cloned()
            .map(Asset::new)
            .ok_or_else(|| DeliveryError::not_found(format!("asset {} not found", self.uid)))
    }
}

/// Lists the stack's asset library.
pub struct AssetLibrary {
    stack: Stack,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl AssetLibrary {
    pub(crate) fn new(stack: Stack) -> Self {
        Self {
            stack,
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Asks the response to carry the total asset count.
    pub fn include_count(&mut self) -> &mut Self {
        self.params
            .push(("include_count".to_string(), "true".to_string()));
        self
    }

    /// Falls back to the default locale when untranslated.
    pub fn include_fallback(&mut self) -> &mut Self {
        self.params
            .push(("include_fallback".to_string(), "true".to_string()));
        self
    }

    /// Caps the number of returned assets.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Skips the first `skip` assets.
    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.params.push(("skip".to_string(), skip.to_string()));
        self
    }

    /// Sorts ascending by a field.
    pub fn order_by_ascending(&mut self, field: &str) -> &mut Self {
        self.params.push(("asc".to_string(), field.to_string()));
        self
    }

    /// Sorts descending by a field.
    pub fn order_by_descending(&mut self, field: &str) -> &mut Self {
        self.params.push(("desc".to_string(), field.to_string()));
        self
    }

    /// Adds a call-scoped header for this listing only.
    pub fn header(&mut self, key: &str, value: &str) -> &mut Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Fetches the asset list.
    pub async fn fetch_all(&self) -> DeliveryResult<AssetList> {
        let mut params = self.params.clone();
        params.push((
            "environment".to_string(),
            self.stack.environment().to_string(),
        ));

        debug!("listing assets");
        let body: Value = self.stack.get("/v3/assets", &self.headers, &params).await?;
        Ok(AssetList::from_response(&body))
    }
}
