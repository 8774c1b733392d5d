//! Authenticated API client.
//!
//! [`SessionClient::send`] runs one logical request through the session
//! pipeline:
//!
//! 1. attach the stored access credential as a bearer header;
//! 2. pass 2xx responses straight through;
//! 3. on failure, classify: refresh-endpoint failures log out, a first 401
//!    refreshes the credential (single-flight) and replays the request once,
//!    everything else goes back to the caller unchanged.

use sacco_domain::{AccessToken, ApiRequest, ApiResponse, TokenRefreshResponse, UserProfile};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use super::coordinator::{RefreshCoordinator, RefreshTicket};
use super::retry::{FailureAction, RetryableRequest};
use crate::config::SessionConfig;
use crate::error::{RefreshError, SessionError, SessionResult};
use crate::ports::{HttpTransport, KeyValueStore, Navigator, StoreError};

/// API client that keeps a bearer credential valid across concurrent calls.
///
/// Construct one per application and share it by reference; the refresh
/// state it owns is what makes concurrent 401s converge on a single refresh.
#[derive(Debug)]
pub struct SessionClient<T, S, N> {
    config: SessionConfig,
    base_url: Option<Url>,
    transport: T,
    store: S,
    navigator: N,
    coordinator: RefreshCoordinator,
}

impl<T, S, N> SessionClient<T, S, N>
where
    T: HttpTransport,
    S: KeyValueStore,
    N: Navigator,
{
    /// Creates a client with a fresh refresh coordinator.
    ///
    /// An unparseable `api_base_url` is logged; the refresh endpoint is then
    /// recognised by path alone.
    pub fn new(config: SessionConfig, transport: T, store: S, navigator: N) -> Self {
        let base_url = match Url::parse(&config.api_base_url) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(url = %config.api_base_url, error = %e, "invalid API base URL");
                None
            }
        };
        Self {
            config,
            base_url,
            transport,
            store,
            navigator,
            coordinator: RefreshCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the key-value store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the navigator.
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Returns the refresh coordinator.
    pub const fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Sends a request with transparent credential refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Status`] for non-2xx responses that are not
    /// recovered (including a second 401 after a refresh),
    /// [`SessionError::Transport`] when no response arrives, and
    /// [`SessionError::Refresh`] when the credential could not be renewed.
    pub async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let mut request = RetryableRequest::new(request);
        let mut refreshed: Option<AccessToken> = None;

        loop {
            let outgoing = match refreshed.take() {
                Some(token) => {
                    let mut outgoing = request.request().clone();
                    outgoing.set_bearer(&token);
                    outgoing
                }
                None => self.authorize(request.request().clone()).await,
            };

            let error = match self.dispatch(&outgoing).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            match request.classify(&error, &self.config.refresh_path, self.base_url.as_ref()) {
                FailureAction::Propagate => {
                    debug!(request = %outgoing.label(), error = %error, "propagating failure");
                    return Err(error);
                }
                FailureAction::Logout => {
                    warn!(request = %outgoing.label(), error = %error, "refresh endpoint failed");
                    self.logout().await;
                    return Err(error);
                }
                FailureAction::Refresh => {
                    request.mark_retried();
                    refreshed = Some(self.renew_credential(request.request()).await?);
                    debug!(request = %outgoing.label(), "replaying with refreshed credential");
                }
            }
        }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`SessionClient::send`].
    pub async fn get(&self, url: impl Into<String>) -> SessionResult<ApiResponse> {
        self.send(ApiRequest::get(url)).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Domain`] if the body cannot be encoded, and
    /// otherwise see [`SessionClient::send`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: impl Into<String>,
        body: &B,
    ) -> SessionResult<ApiResponse> {
        self.send(ApiRequest::post(url).json(body)?).await
    }

    /// Attaches the stored access credential, if any, as a bearer header.
    ///
    /// Never fails: a missing or unreadable credential leaves the request
    /// unauthenticated and the backend decides.
    pub async fn authorize(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(token) = self.access_token().await {
            request.set_bearer(&token);
        }
        request
    }

    /// Returns the stored access credential.
    pub async fn access_token(&self) -> Option<AccessToken> {
        let raw = match self.store.get(&self.config.access_token_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read access token, sending unauthenticated");
                return None;
            }
        };
        AccessToken::new(raw).ok()
    }

    /// Returns the cached user profile.
    pub async fn user_profile(&self) -> Option<UserProfile> {
        let raw = match self.store.get(&self.config.user_profile_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read user profile");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable user profile snapshot");
                None
            }
        }
    }

    /// Returns true if an access credential is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.access_token().await.is_some()
    }

    /// Persists the credential (and profile) obtained from a login.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn establish_session(
        &self,
        token: &AccessToken,
        profile: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        self.store
            .set(&self.config.access_token_key, token.as_str())
            .await?;
        if let Some(profile) = profile {
            let snapshot = serde_json::to_string(profile)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            self.store
                .set(&self.config.user_profile_key, &snapshot)
                .await?;
        }
        info!(key = %self.config.access_token_key, "session established");
        Ok(())
    }

    /// Clears the stored session and returns to the login route.
    ///
    /// Skips the redirect when the login route is already displayed, so
    /// concurrent failures reaching this path navigate at most once.
    pub async fn logout(&self) {
        for key in [&self.config.access_token_key, &self.config.user_profile_key] {
            if let Err(e) = self.store.remove(key).await {
                warn!(key = %key, error = %e, "failed to clear session key");
            }
        }

        let current = self.navigator.current_path();
        let current_route = current.split(['?', '#']).next().unwrap_or_default();
        if current_route == self.config.login_path {
            debug!(route = %current, "already on login route, skipping redirect");
            return;
        }
        info!(from = %current, to = %self.config.login_path, "session cleared, redirecting to login");
        self.navigator.redirect(&self.config.login_path);
    }

    /// Issues the request and turns non-2xx statuses into errors.
    async fn dispatch(&self, request: &ApiRequest) -> SessionResult<ApiResponse> {
        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(SessionError::Status(Box::new(response)))
        }
    }

    /// Obtains a new credential, refreshing or waiting on the refresh in flight.
    async fn renew_credential(&self, request: &ApiRequest) -> Result<AccessToken, RefreshError> {
        match self.coordinator.begin(request) {
            RefreshTicket::Wait(pending) => pending.wait().await,
            RefreshTicket::Lead(lease) => match self.request_new_token().await {
                Ok(token) => {
                    let released = lease.resolve(&token);
                    info!(released, "access token refreshed");
                    Ok(token)
                }
                Err(error) => {
                    let released = lease.reject(&error);
                    warn!(error = %error, released, "token refresh failed");
                    self.logout().await;
                    Err(error)
                }
            },
        }
    }

    /// Calls the refresh endpoint directly on the transport and stores the result.
    async fn request_new_token(&self) -> Result<AccessToken, RefreshError> {
        let request = ApiRequest::post(&self.config.refresh_path).with_credentials();
        let response = self
            .transport
            .execute(&request)
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                body: response.text(),
            });
        }

        let token = response
            .json::<TokenRefreshResponse>()
            .and_then(TokenRefreshResponse::into_token)
            .map_err(|e| RefreshError::MalformedResponse(e.to_string()))?;

        self.store
            .set(&self.config.access_token_key, token.as_str())
            .await
            .map_err(|e| RefreshError::Store(e.to_string()))?;

        Ok(token)
    }
}
