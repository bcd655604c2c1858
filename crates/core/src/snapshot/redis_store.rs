//! Redis-backed snapshot store.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::store::{SnapshotStore, StoreError};

/// Snapshot store on a Redis server, using `SET key value EX ttl` and `GET`.
///
/// The connection manager reconnects on its own after transient failures.
#[derive(Clone)]
pub struct RedisSnapshotStore {
    manager: ConnectionManager,
}

impl RedisSnapshotStore {
    /// Connect to `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("Connected to Redis snapshot store");
        Ok(Self { manager })
    }
}

fn map_redis_error(e: redis::RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Backend(e.to_string())
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        // Redis rejects EX 0
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)?;
        debug!("Redis SET {} EX {}", key, seconds);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(map_redis_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        conn.exists::<_, bool>("crypto:health-check")
            .await
            .map(|_| ())
            .map_err(map_redis_error)
    }
}
