//! HTTP transport port

use std::future::Future;

use sacco_domain::{ApiRequest, ApiResponse};

/// Errors raised before a response status is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request URL could not be resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for issuing a single HTTP request with no interception.
///
/// Implementations return `Ok` for every response that arrives, whatever its
/// status; classifying non-2xx statuses is the session layer's job. When
/// `request.with_credentials` is set, same-origin cookies (such as the
/// HTTP-only refresh cookie) must be sent and cookies set by the response
/// must be kept.
pub trait HttpTransport: Send + Sync {
    /// Executes the request exactly as described.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}
