//! Login and refresh-cookie persistence for native clients.
//!
//! A browser keeps the HTTP-only refresh cookie for us. A native process
//! loses its cookie jar on exit, so the refresh-endpoint cookies are copied
//! into the key-value store next to the access credential and put back into
//! the jar on the next start.

use sacco_application::ports::{HttpTransport, KeyValueStore, Navigator, StoreError};
use sacco_application::{SessionClient, SessionError, SessionResult};
use sacco_domain::{AccessToken, ApiRequest, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ReqwestTransport;

/// Client type whose transport owns a cookie jar.
pub type HttpSessionClient<S, N> = SessionClient<ReqwestTransport, S, N>;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Exchanges credentials for a session and persists it.
///
/// The login call goes straight to the transport with cookies enabled, so a
/// rejected login is never mistaken for an expired session.
///
/// # Errors
///
/// Returns [`SessionError::Status`] if the backend refuses the credentials,
/// [`SessionError::Domain`] if the response is not a login payload, and
/// transport or store errors otherwise.
pub async fn log_in<S, N>(
    client: &HttpSessionClient<S, N>,
    username: &str,
    password: &str,
) -> SessionResult<Option<UserProfile>>
where
    S: KeyValueStore,
    N: Navigator,
{
    let request = ApiRequest::post(&client.config().login_endpoint)
        .json(&LoginRequest { username, password })?
        .with_credentials();
    let response = client.transport().execute(&request).await?;
    if !response.is_success() {
        return Err(SessionError::Status(Box::new(response)));
    }

    let login: LoginResponse = response.json()?;
    let token = AccessToken::new(login.access)?;
    client
        .establish_session(&token, login.user.as_ref())
        .await?;
    save_refresh_cookie(client).await?;
    info!(username, "logged in");
    Ok(login.user)
}

/// Seeds the cookie jar from the store. Returns true if a cookie was found.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn restore_refresh_cookie<S, N>(
    client: &HttpSessionClient<S, N>,
) -> Result<bool, StoreError>
where
    S: KeyValueStore,
    N: Navigator,
{
    let key = &client.config().refresh_cookie_key;
    let Some(header) = client.store().get(key).await? else {
        return Ok(false);
    };
    let restored = client.transport().restore_cookie_header(&header);
    debug!(restored, "refresh cookie restored");
    Ok(restored > 0)
}

/// Copies the refresh-endpoint cookies into the store.
///
/// Once the session is gone (for example after a failed refresh logged out)
/// the stored cookie is removed instead. Returns true if a cookie was saved.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub async fn save_refresh_cookie<S, N>(client: &HttpSessionClient<S, N>) -> Result<bool, StoreError>
where
    S: KeyValueStore,
    N: Navigator,
{
    let config = client.config();
    let header = if client.is_authenticated().await {
        client.transport().cookie_header(&config.refresh_path)
    } else {
        None
    };
    match header {
        Some(header) => {
            client.store().set(&config.refresh_cookie_key, &header).await?;
            Ok(true)
        }
        None => {
            client.store().remove(&config.refresh_cookie_key).await?;
            Ok(false)
        }
    }
}
