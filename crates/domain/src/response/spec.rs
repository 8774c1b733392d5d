//! API response type

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::request::Headers;

/// HTTP status returned when a request lacks valid authentication.
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Response to one HTTP call, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Raw response body
    pub body: Vec<u8>,
    /// Time from send to last body byte
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Creates a response carrying the JSON encoding of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json_body<T: Serialize + ?Sized>(status: u16, value: &T) -> DomainResult<Self> {
        let body = serde_json::to_vec(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        let mut response = Self::new(status, body);
        response.headers.set("Content-Type", "application/json");
        Ok(response)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the status is 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == STATUS_UNAUTHORIZED
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| DomainError::InvalidBody(e.to_string()))
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
