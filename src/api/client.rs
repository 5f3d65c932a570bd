use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure of a server call, from the overlay's point of view.
///
/// Every variant is handled the same way by the UI (generic unexpected-error
/// alert, state unchanged); the split exists for logging.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure or non-2xx response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered but the body did not match the expected shape.
    #[error("malformed server response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The server answered with an envelope that is neither a success nor a
    /// validation failure.
    #[error("server rejected the request")]
    Rejected,
}

/// HTTP transport the overlay issues its calls through.
///
/// Transport mechanics (base URL, cookies, CSRF headers) live behind this
/// trait; the overlay only sees relative paths and JSON bodies. Requests are
/// not abortable - a caller that no longer cares simply drops the result.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue a GET request and parse the response body as JSON.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;

    /// Issue a form POST request and parse the response body as JSON.
    async fn post(&self, path: &str, form: Value) -> Result<Value, TransportError>;
}
