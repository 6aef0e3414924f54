//! Stack configuration: regions, credentials, live preview, retry.

use serde::{Deserialize, Serialize};

/// Hosting region for a stack. Selects the delivery host unless the
/// configuration overrides it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// North America (default).
    #[default]
    Us,
    /// Europe.
    Eu,
    /// Azure, North America.
    AzureNa,
    /// Azure, Europe.
    AzureEu,
}

impl Region {
    /// The delivery CDN host for this region.
    pub fn delivery_host(self) -> &'static str {
        match self {
            Region::Us => "https://cdn.strata.io",
            Region::Eu => "https://eu-cdn.strata.io",
            Region::AzureNa => "https://azure-na-cdn.strata.io",
            Region::AzureEu => "https://azure-eu-cdn.strata.io",
        }
    }
}

/// Live preview configuration.
///
/// When enabled and a preview hash is set, request assembly swaps to the
/// preview host and sends `live_preview` + `authorization` headers in place
/// of `access_token` / `environment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePreviewConfig {
    /// Whether live preview is enabled for this stack.
    pub enabled: bool,
    /// The preview token sent as the `authorization` header.
    pub preview_token: String,
    /// The preview host to route preview requests to.
    pub host: String,
    /// The current preview session hash. Preview routing only activates
    /// while a hash is set.
    pub hash: Option<String>,
}

impl Default for LivePreviewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            preview_token: String::new(),
            host: "https://rest-preview.strata.io".to_string(),
            hash: None,
        }
    }
}

impl LivePreviewConfig {
    /// Whether preview routing applies to outgoing requests.
    pub fn is_active(&self) -> bool {
        self.enabled && self.hash.is_some()
    }
}

/// Retry policy for transient transport failures.
///
/// Applies inside the transport adapter only; callers never observe
/// intermediate attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay before the first retry; doubles per attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 300,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> std::time::Duration {
        let factor = 1u64 << (attempt.saturating_sub(1)).min(10);
        std::time::Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Configuration for a stack (the top-level content repository scope).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// The stack's API key.
    pub api_key: String,
    /// The delivery token, sent as the `access_token` header.
    pub delivery_token: String,
    /// The publishing environment to read from.
    pub environment: String,
    /// Hosting region; selects the delivery host.
    pub region: Region,
    /// Explicit host override (e.g. for tests or private deployments).
    pub host: Option<String>,
    /// Branch to read from, when the stack uses branches.
    pub branch: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Live preview settings, when the stack uses live preview.
    pub live_preview: Option<LivePreviewConfig>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            delivery_token: String::new(),
            environment: String::new(),
            region: Region::default(),
            host: None,
            branch: None,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
            live_preview: None,
        }
    }
}

impl StackConfig {
    /// Creates a configuration with the three required credentials.
    pub fn new(
        api_key: impl Into<String>,
        delivery_token: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            delivery_token: delivery_token.into(),
            environment: environment.into(),
            ..Self::default()
        }
    }

    /// The base URL for delivery requests, honoring host override and
    /// active live preview.
    pub fn delivery_base_url(&self) -> &str {
        if let Some(preview) = &self.live_preview {
            if preview.is_active() {
                return &preview.host;
            }
        }
        match &self.host {
            Some(host) => host,
            None => self.region.delivery_host(),
        }
    }
}
