//! Local key/value persistence.
//!
//! The inventory treats storage as an external collaborator: a synchronous,
//! process-local map from string keys to string values that survives restarts.

pub mod file;
pub mod kv;

pub use file::FileKeyValueStore;
pub use kv::{InMemoryKeyValueStore, KeyValueStore, StorageError, StorageResult};
