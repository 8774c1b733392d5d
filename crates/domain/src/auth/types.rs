//! Session credential types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Short-lived bearer credential authorizing API requests.
///
/// The token is opaque. `Debug` and `Display` only show a preview so the
/// full value never ends up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or only whitespace.
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Get a preview of the token (first 8 chars + ...).
    ///
    /// Tokens too short to truncate safely are fully masked.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.len() > 12 {
            let cut = self
                .0
                .char_indices()
                .nth(8)
                .map_or(self.0.len(), |(idx, _)| idx);
            format!("{}...", &self.0[..cut])
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

/// Body returned by the token refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRefreshResponse {
    /// The new access credential.
    pub access: String,
}

impl TokenRefreshResponse {
    /// Converts the response into an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the `access` field is empty.
    pub fn into_token(self) -> DomainResult<AccessToken> {
        AccessToken::new(self.access)
    }
}

/// Cached snapshot of the logged-in user, as returned by the login endpoint.
///
/// The shape is owned by the backend, so only a few well-known fields get
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(serde_json::Value);

impl UserProfile {
    /// Wraps a profile value.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the raw profile value.
    #[must_use]
    pub const fn value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Returns the `username` field, if present.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(serde_json::Value::as_str)
    }

    /// Returns the `role` field, if present.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(serde_json::Value::as_str)
    }
}
