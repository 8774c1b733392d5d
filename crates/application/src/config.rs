//! Session configuration

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Default path of the token refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/token/refresh/";
/// Default login route.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Default store key for the access credential.
pub const DEFAULT_ACCESS_TOKEN_KEY: &str = "access_token";
/// Default store key for the user-profile snapshot.
pub const DEFAULT_USER_PROFILE_KEY: &str = "user";
/// Default store key for the persisted refresh cookie.
pub const DEFAULT_REFRESH_COOKIE_KEY: &str = "refresh_cookie";
/// Default transport timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Default path of the credential login endpoint.
pub const DEFAULT_LOGIN_ENDPOINT: &str = "/auth/login/";

/// Settings shared by the session client and its adapters.
///
/// Every field has a default, so a partial JSON document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL that relative request paths are resolved against.
    pub api_base_url: String,
    /// Path of the token refresh endpoint.
    pub refresh_path: String,
    /// Path of the credential login endpoint.
    pub login_endpoint: String,
    /// Route shown when the session cannot be recovered.
    pub login_path: String,
    /// Store key holding the access credential.
    pub access_token_key: String,
    /// Store key holding the cached user profile.
    pub user_profile_key: String,
    /// Store key holding the refresh cookie between runs of a native client.
    pub refresh_cookie_key: String,
    /// Per-request transport timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            access_token_key: DEFAULT_ACCESS_TOKEN_KEY.to_string(),
            user_profile_key: DEFAULT_USER_PROFILE_KEY.to_string(),
            refresh_cookie_key: DEFAULT_REFRESH_COOKIE_KEY.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the login route.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Sets the refresh endpoint path.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Sets the transport timeout.
    #[must_use]
    pub const fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }
}
