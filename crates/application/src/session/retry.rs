//! Retry marker and failure classification.

use sacco_domain::ApiRequest;
use url::Url;

use crate::error::SessionError;

/// What the session client does with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Hand the error back to the caller unchanged.
    Propagate,
    /// Clear the session and return to login, then hand the error back.
    Logout,
    /// Obtain a new access credential and replay the request once.
    Refresh,
}

/// A logical request plus the marker bounding it to one refresh-and-retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableRequest {
    request: ApiRequest,
    retried: bool,
}

impl RetryableRequest {
    /// Wraps a request that has not been retried.
    #[must_use]
    pub const fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    /// Returns the wrapped request.
    #[must_use]
    pub const fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// Returns true once a refresh-and-retry cycle has been spent.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    /// Spends the request's single refresh-and-retry cycle.
    pub const fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Decides how to handle `error` for this request.
    ///
    /// A failure of the refresh endpoint itself always logs out, so a
    /// rejected refresh cookie can never loop back into another refresh.
    /// The endpoint is matched after resolving against `base`, when known.
    /// Only a first 401 is refreshable.
    #[must_use]
    pub fn classify(
        &self,
        error: &SessionError,
        refresh_path: &str,
        base: Option<&Url>,
    ) -> FailureAction {
        let refresh_call = base.map_or_else(
            || self.request.targets(refresh_path),
            |base| self.request.addresses(refresh_path, base),
        );
        if refresh_call {
            return FailureAction::Logout;
        }
        if self.retried || !error.is_unauthorized() {
            return FailureAction::Propagate;
        }
        FailureAction::Refresh
    }
}
