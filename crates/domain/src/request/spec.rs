//! API request descriptor

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::{Headers, HttpMethod, header::AUTHORIZATION};
use crate::auth::AccessToken;
use crate::error::{DomainError, DomainResult};

/// Description of one HTTP call against the API.
///
/// The URL is either absolute or a path relative to the configured API base
/// URL (for example `/members/`). The descriptor is opaque to the session
/// layer apart from its URL and `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Identifier kept across retries of the same logical request
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL or API-relative path
    pub url: String,
    /// HTTP headers
    pub headers: Headers,
    /// Request body, already encoded
    pub body: Option<String>,
    /// Whether same-origin cookies must accompany the request
    pub with_credentials: bool,
}

impl ApiRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            with_credentials: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request with no body.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Attaches a JSON body and the matching `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        let body =
            serde_json::to_string(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.headers.set("Content-Type", "application/json");
        self.body = Some(body);
        Ok(self)
    }

    /// Adds a header, replacing any existing value with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Marks the request as needing same-origin cookies.
    #[must_use]
    pub const fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }

    /// Sets the `Authorization` header to the bearer form of `token`.
    pub fn set_bearer(&mut self, token: &AccessToken) {
        self.headers.set(AUTHORIZATION, token.authorization_header());
    }

    /// Returns the `Authorization` header value, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION)
    }

    /// Returns the path component of the URL, without query or fragment.
    #[must_use]
    pub fn path(&self) -> String {
        if let Ok(parsed) = Url::parse(&self.url) {
            return parsed.path().to_string();
        }
        let end = self.url.find(['?', '#']).unwrap_or(self.url.len());
        self.url[..end].to_string()
    }

    /// Returns true if this request addresses the given API path.
    ///
    /// A trailing slash is significant on the API, so `/auth/token/refresh`
    /// and `/auth/token/refresh/` are different endpoints.
    #[must_use]
    pub fn targets(&self, path: &str) -> bool {
        self.path() == path
    }

    /// Returns true if this request and `path` name the same endpoint once
    /// both are resolved against `base`.
    ///
    /// Query and fragment are ignored. Falls back to [`ApiRequest::targets`]
    /// when either URL cannot be resolved.
    #[must_use]
    pub fn addresses(&self, path: &str, base: &Url) -> bool {
        let target = Self::new(self.method, path);
        match (self.endpoint(base), target.endpoint(base)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => self.targets(path),
        }
    }

    fn endpoint(&self, base: &Url) -> Option<Url> {
        let mut url = self.resolve(base).ok()?;
        url.set_query(None);
        url.set_fragment(None);
        Some(url)
    }

    /// Resolves the URL against an API base URL.
    ///
    /// Absolute URLs are returned unchanged. Relative paths are appended to
    /// the base URL's path so that a base of `https://host/api` and a path of
    /// `/members/` yields `https://host/api/members/`.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is malformed.
    pub fn resolve(&self, base: &Url) -> DomainResult<Url> {
        if let Ok(absolute) = Url::parse(&self.url) {
            return Ok(absolute);
        }
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.url.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// Short `METHOD url` label used in log events.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}
