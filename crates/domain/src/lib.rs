//! SACCO Domain - Core session types
//!
//! This crate defines the request, response and credential types shared by
//! the session client. All types here are pure Rust with no I/O.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;

pub use auth::{AccessToken, TokenRefreshResponse, UserProfile};
pub use error::{DomainError, DomainResult};
pub use request::{ApiRequest, Header, Headers, HttpMethod};
pub use response::{ApiResponse, STATUS_UNAUTHORIZED};
