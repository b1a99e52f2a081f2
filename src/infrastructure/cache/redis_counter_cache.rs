use super::traits::CounterCache;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tracing::{debug, error};

pub struct RedisCounterCache {
    client: Client,
}

impl RedisCounterCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn get_count(&self, key: &str) -> Option<i32> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Redis connection failed for key={}: {}. Bypassing cache.", key, e);
                return None;
            }
        };

        match conn.get::<_, Option<i32>>(key).await {
            Ok(Some(value)) => {
                debug!("Cache HIT for key={}", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache MISS for key={}", key);
                None
            }
            Err(e) => {
                error!("Redis GET failed for key={}: {}. Bypassing cache.", key, e);
                None
            }
        }
    }

    async fn set_count(&self, key: &str, value: i32, ttl_seconds: u64) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Redis connection failed for key={}: {}. Value not cached.", key, e);
                return;
            }
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await {
            error!(
                "Failed to write cache for key={}: {}. Next read will hit the database.",
                key, e
            );
        }
    }

    async fn invalidate(&self, key: &str) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(
                    "Redis connection failed invalidating key={}: {}. Stale value may be served until TTL.",
                    key, e
                );
                return;
            }
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            error!(
                "Failed to invalidate key={}: {}. Stale value may be served until TTL.",
                key, e
            );
        }
    }
}
