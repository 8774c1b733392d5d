//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while building or inspecting API descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request or response body could not be encoded or decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An access token was empty.
    #[error("access token must not be empty")]
    EmptyToken,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
