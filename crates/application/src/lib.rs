//! SACCO Application - Session coordination and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, key-value store, navigation, file system)
//! - The session client and its token refresh coordinator
//! - Session configuration and error handling

pub mod config;
pub mod error;
pub mod ports;
pub mod session;

pub use config::SessionConfig;
pub use error::{RefreshError, SessionError, SessionResult};
pub use ports::{HttpTransport, KeyValueStore, Navigator, StoreError, TransportError};
pub use session::{
    FailureAction, PendingRefresh, RefreshCoordinator, RefreshLease, RefreshOutcome,
    RefreshTicket, RetryableRequest, SessionClient,
};
