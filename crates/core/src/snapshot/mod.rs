//! Snapshot publication and retrieval.
//!
//! - **Model** (`model.rs`) - `Snapshot` and `RunStatistics`
//! - **Store** (`store.rs`) - The get/set-with-TTL contract
//! - **Backends** (`memory_store.rs`, `redis_store.rs`)
//! - **Publisher** / **Reader** - Write and read the single well-known key

pub mod memory_store;
pub mod model;
pub mod publisher;
pub mod reader;
pub mod redis_store;
pub mod store;


pub use memory_store::InMemorySnapshotStore;
pub use model::{RunStatistics, Snapshot};
pub use publisher::SnapshotPublisher;
pub use reader::SnapshotReader;
pub use redis_store::RedisSnapshotStore;
pub use store::{SnapshotStore, StoreError};
