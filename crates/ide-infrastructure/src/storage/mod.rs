//! Storage layer: JSON snapshots and [`KeyValueStore`](ide_core::storage::KeyValueStore) implementations.

mod file_store;
mod memory_store;
mod snapshot;

pub use file_store::JsonFileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use snapshot::{JsonSnapshot, SnapshotError};
