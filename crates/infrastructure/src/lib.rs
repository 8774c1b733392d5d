//! SACCO Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod navigation;
pub mod persistence;
pub mod serialization;

pub use adapters::{
    HttpSessionClient, ReqwestTransport, log_in, restore_refresh_cookie, save_refresh_cookie,
};
pub use navigation::RouteNavigator;
pub use persistence::{FileKeyValueStore, MemoryKeyValueStore, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
