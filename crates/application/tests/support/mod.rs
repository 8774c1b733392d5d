//! In-process fakes for the session ports.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use sacco_application::ports::{HttpTransport, KeyValueStore, Navigator, StoreError, TransportError};
use sacco_application::{SessionClient, SessionConfig};
use sacco_domain::{ApiRequest, ApiResponse};
use serde_json::json;

pub const REFRESH_PATH: &str = "/auth/token/refresh/";
pub const LOGIN_PATH: &str = "/login";
pub const ACCESS_KEY: &str = "access_token";
pub const PROFILE_KEY: &str = "user";

/// Fake API: accepts one bearer token and mints a new one on refresh.
pub struct FakeBackend {
    accepted: Mutex<Option<String>>,
    refresh_reply: ApiResponse,
    refresh_delay: Duration,
    reject_all_tokens: bool,
    failing_paths: HashMap<String, u16>,
    unreachable_paths: Vec<String>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    /// A backend whose refresh endpoint issues `token`.
    pub fn issuing(token: &str) -> Self {
        Self {
            accepted: Mutex::new(None),
            refresh_reply: ApiResponse::json_body(200, &json!({ "access": token })).unwrap(),
            refresh_delay: Duration::ZERO,
            reject_all_tokens: false,
            failing_paths: HashMap::new(),
            unreachable_paths: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend whose refresh endpoint answers `status`.
    pub fn refusing(status: u16) -> Self {
        Self {
            refresh_reply: ApiResponse::new(status, r#"{"detail":"Token is invalid or expired"}"#),
            ..Self::issuing("unused")
        }
    }

    /// Replaces the refresh reply wholesale.
    pub fn with_refresh_reply(mut self, reply: ApiResponse) -> Self {
        self.refresh_reply = reply;
        self
    }

    pub const fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Makes the API accept `token` from the start.
    pub fn accepting(self, token: &str) -> Self {
        *self.accepted.lock() = Some(token.to_string());
        self
    }

    /// Answers 401 to every non-refresh request, even with a fresh token.
    pub const fn rejecting_all_tokens(mut self) -> Self {
        self.reject_all_tokens = true;
        self
    }

    pub fn failing(mut self, path: &str, status: u16) -> Self {
        self.failing_paths.insert(path.to_string(), status);
        self
    }

    pub fn unreachable(mut self, path: &str) -> Self {
        self.unreachable_paths.push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.calls_to(REFRESH_PATH).len()
    }

    pub fn calls_to(&self, path: &str) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .iter()
            .filter(|r| r.targets(path))
            .cloned()
            .collect()
    }

    /// Authorization header of every call to `path`, in issue order.
    pub fn authorizations_for(&self, path: &str) -> Vec<Option<String>> {
        self.calls_to(path)
            .iter()
            .map(|r| r.authorization().map(str::to_string))
            .collect()
    }

    async fn refresh(&self) -> ApiResponse {
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        let reply = self.refresh_reply.clone();
        if reply.is_success()
            && let Ok(body) = reply.json::<serde_json::Value>()
            && let Some(token) = body["access"].as_str()
        {
            *self.accepted.lock() = Some(token.to_string());
        }
        reply
    }
}

impl HttpTransport for FakeBackend {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.lock().push(request.clone());

        if request.targets(REFRESH_PATH) {
            return Ok(self.refresh().await);
        }
        let path = request.path();
        if self.unreachable_paths.contains(&path) {
            return Err(TransportError::ConnectionFailed("connection reset".to_string()));
        }
        if let Some(status) = self.failing_paths.get(&path) {
            return Ok(ApiResponse::new(*status, "{}"));
        }

        let accepted = self.accepted.lock().clone();
        let authorized = !self.reject_all_tokens
            && accepted.is_some_and(|token| {
                request.authorization() == Some(format!("Bearer {token}").as_str())
            });
        if authorized {
            Ok(ApiResponse::json_body(200, &json!({ "path": path })).unwrap())
        } else {
            Ok(ApiResponse::new(
                401,
                r#"{"detail":"Given token not valid for any token type"}"#,
            ))
        }
    }
}

/// Local-storage stand-in.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock();
            for (key, value) in entries {
                values.insert((*key).to_string(), (*value).to_string());
            }
        }
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("storage quota exceeded")));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Navigator that records redirects and lands on the target route.
pub struct RecordingNavigator {
    current: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn redirect(&self, path: &str) {
        self.redirects.lock().push(path.to_string());
        *self.current.lock() = path.to_string();
    }
}

pub type TestClient = SessionClient<FakeBackend, MemoryStore, RecordingNavigator>;

/// Client on `/members` with an expired `tok1` and a cached profile.
pub fn signed_in(backend: FakeBackend) -> TestClient {
    SessionClient::new(
        SessionConfig::default(),
        backend,
        MemoryStore::with(&[
            (ACCESS_KEY, "tok1"),
            (PROFILE_KEY, r#"{"username":"treasurer"}"#),
        ]),
        RecordingNavigator::at("/members"),
    )
}

/// Client with an empty store.
pub fn signed_out(backend: FakeBackend) -> TestClient {
    SessionClient::new(
        SessionConfig::default(),
        backend,
        MemoryStore::default(),
        RecordingNavigator::at("/members"),
    )
}
