//! Error types for the delivery client.

use serde_json::Value;
use strata_query::QueryError;
use thiserror::Error;

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Default message used when a response body is not valid JSON.
pub(crate) const PARSE_FAILURE_MESSAGE: &str = "response body could not be parsed";

/// Errors that can occur in delivery operations.
///
/// Every async operation resolves to exactly one `Ok` or one `Err`; local
/// validation failures are detected before any request is issued but travel
/// the same `Result` channel as network outcomes.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A required identifier is missing (empty content type uid, missing
    /// stack credentials). Detected before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed filter or projection arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport failure with no HTTP status (connection, timeout).
    /// Generic retryable category.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP response, or an unparseable body. Carries the remote
    /// error fields when the body provided them.
    #[error("remote error ({status}): {message}")]
    Remote {
        /// HTTP status of the response.
        status: u16,
        /// `error_message` from the body, or a default.
        message: String,
        /// Numeric `error_code` from the body, when present.
        code: Option<i64>,
        /// The `errors` detail blob, when present.
        details: Option<Value>,
    },
}

impl DeliveryError {
    /// Builds a `Remote` error from a response body's error fields,
    /// falling back to a default message.
    pub(crate) fn from_remote_body(status: u16, body: Option<Value>) -> Self {
        match body {
            Some(body) => DeliveryError::Remote {
                status,
                message: body
                    .get("error_message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string(),
                code: body.get("error_code").and_then(Value::as_i64),
                details: body.get("errors").cloned(),
            },
            None => DeliveryError::Remote {
                status,
                message: PARSE_FAILURE_MESSAGE.to_string(),
                code: None,
                details: None,
            },
        }
    }

    /// A 404-shaped remote error for lookups that matched nothing.
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        DeliveryError::Remote {
            status: 404,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Whether a retry could plausibly succeed: any network failure, rate
    /// limiting, or a server-side error.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Network(_) => true,
            DeliveryError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<QueryError> for DeliveryError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingContentType => DeliveryError::Configuration(err.to_string()),
            QueryError::InvalidArgument(message) => DeliveryError::Validation(message),
        }
    }
}
