//! HTTP transport adapter.
//!
//! The rest of the crate depends on transport only through the narrow
//! [`Transport`] contract: execute one GET, get JSON or a structured error.
//! Retry/backoff on transient failures lives here and is invisible to
//! callers; they observe a single terminal outcome per request.

use crate::config::RetryPolicy;
use crate::error::{DeliveryError, DeliveryResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Executes one HTTP GET given URL, headers, and query parameters.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request, returning the parsed JSON body.
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> DeliveryResult<Value>;
}

/// Reqwest-backed transport with retry on transient failures.
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Creates a transport with the given timeout and retry policy.
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client, retry }
    }

    async fn get_once(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> DeliveryResult<Value> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key, value);
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        debug!("GET {}", url);

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            return Err(DeliveryError::from_remote_body(status.as_u16(), body));
        }

        // A 2xx body that fails to parse degrades to a remote error with a
        // fixed default message, not a distinct parse category.
        body.ok_or_else(|| DeliveryError::from_remote_body(status.as_u16(), None))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> DeliveryResult<Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.get_once(url, headers, params).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.retry.max_attempts && err.is_retryable() => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "request attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, self.retry.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// A scripted transport for testing request assembly without a server.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One request as observed by the mock transport.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        /// The full request URL.
        pub url: String,
        /// Headers in merge order.
        pub headers: Vec<(String, String)>,
        /// Query parameters in serialization order.
        pub params: Vec<(String, String)>,
    }

    /// Transport that returns scripted responses and records requests.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<DeliveryResult<Value>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        /// Creates an empty mock; requests fail until responses are queued.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues the next response.
        pub fn push_response(&self, response: DeliveryResult<Value>) {
            self.responses.lock().unwrap().push_back(response);
        }

        /// The requests observed so far.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
            params: &[(String, String)],
        ) -> DeliveryResult<Value> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                headers: headers.to_vec(),
                params: params.to_vec(),
            });

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(DeliveryError::Network("no scripted response".to_string())))
        }
    }
}
