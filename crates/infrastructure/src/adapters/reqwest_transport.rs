//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. Relative request URLs
//! are resolved against the configured API base URL, and requests flagged
//! `with_credentials` share a cookie jar so the HTTP-only refresh cookie set
//! at login travels with the refresh call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, ClientBuilder, Method, Url};
use sacco_application::SessionConfig;
use sacco_application::ports::{HttpTransport, TransportError};
use sacco_domain::{ApiRequest, ApiResponse, Headers, HttpMethod};
use tracing::trace;

const USER_AGENT: &str = concat!("sacco/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by two reqwest clients.
///
/// The credentialed client owns the cookie jar; the plain client never sends
/// or stores cookies.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: Url,
    client: Client,
    credentialed: Client,
    cookies: Arc<Jar>,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed or a client cannot be built.
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", config.api_base_url)))?;
        let cookies = Arc::new(Jar::default());

        let client = Self::builder()
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        let credentialed = Self::builder()
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            credentialed,
            cookies,
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    fn builder() -> ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Seeds the cookie jar, e.g. with a refresh cookie restored from elsewhere.
    pub fn add_cookie(&self, cookie: &str) {
        self.cookies.add_cookie_str(cookie, &self.base_url);
    }

    /// Returns the `Cookie` header a credentialed request to `path` would carry.
    #[must_use]
    pub fn cookie_header(&self, path: &str) -> Option<String> {
        let url = ApiRequest::post(path).resolve(&self.base_url).ok()?;
        let value = self.cookies.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    /// Seeds the jar from a `Cookie` header captured by [`Self::cookie_header`].
    ///
    /// Returns the number of cookies added.
    pub fn restore_cookie_header(&self, header: &str) -> usize {
        let pairs: Vec<&str> = header
            .split(';')
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect();
        for pair in &pairs {
            self.add_cookie(&format!("{pair}; Path=/"));
        }
        pairs.len()
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            return TransportError::ConnectionFailed(format!("{host}: {error}"));
        }
        if error.is_redirect() {
            return TransportError::Other(format!("more than {MAX_REDIRECTS} redirects"));
        }
        TransportError::Other(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = request
            .resolve(&self.base_url)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let client = if request.with_credentials {
            &self.credentialed
        } else {
            &self.client
        };
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = self.timeout.as_millis() as u64;

        let mut builder = client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_str().unwrap_or("<binary>")))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();

        let mut api_response = ApiResponse::new(status, body);
        api_response.headers = headers;
        api_response.duration = start.elapsed();
        trace!(
            request = %request.label(),
            status,
            elapsed_ms = api_response.duration.as_millis(),
            "response received"
        );
        Ok(api_response)
    }
}
