//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod file_system;
mod http_transport;
mod key_value_store;
mod navigator;

pub use file_system::{FileSystem, FileSystemError};
pub use http_transport::{HttpTransport, TransportError};
pub use key_value_store::{KeyValueStore, StoreError};
pub use navigator::Navigator;
