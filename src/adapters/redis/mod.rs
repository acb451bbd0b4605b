//! Redis adapters - Cache implementations.

mod snapshot_cache;

pub use snapshot_cache::RedisSnapshotCache;
