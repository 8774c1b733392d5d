//! Session error types

use sacco_domain::{ApiResponse, DomainError};
use thiserror::Error;

use crate::ports::{StoreError, TransportError};

/// Why a token refresh did not produce a new access credential.
///
/// Cloneable because one failure is delivered to every request that was
/// waiting on the same refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with status {status}")]
    Rejected {
        /// Status returned by the endpoint.
        status: u16,
        /// Response body, for diagnostics only.
        body: String,
    },

    /// The refresh call never produced a response.
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The endpoint answered 2xx without a usable `access` field.
    #[error("malformed refresh response: {0}")]
    MalformedResponse(String),

    /// The new credential could not be persisted.
    #[error("failed to persist refreshed token: {0}")]
    Store(String),

    /// The refresh was dropped before it settled.
    #[error("refresh abandoned before completion")]
    Abandoned,
}

/// Errors surfaced to callers of the session client.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The API answered with a non-2xx status.
    #[error("request failed with status {}", .0.status)]
    Status(Box<ApiResponse>),

    /// No response could be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request needed a new credential and the refresh failed.
    #[error("session refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// Session state could not be read or written.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// The request could not be built.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SessionError {
    /// Returns the HTTP status if the API answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status),
            _ => None,
        }
    }

    /// Returns the failed response if the API answered.
    #[must_use]
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns true if the API answered 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.response().is_some_and(ApiResponse::is_unauthorized)
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
