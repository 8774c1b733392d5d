//! Persistence adapters for the key-value store port.

mod file_store;
mod file_system;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use file_system::TokioFileSystem;
pub use memory_store::MemoryKeyValueStore;
