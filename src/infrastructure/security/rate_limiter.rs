use redis::{AsyncCommands, Client};

/// Fixed-window per-IP counter backed by Redis.
///
/// Fail-open: when Redis is unreachable the check passes, so a cache outage
/// never blocks posting. The window is one UTC day.
pub struct RateLimiter {
    client: Client,
}

impl RateLimiter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns true while `key` is under `limit` for the current UTC day.
    pub async fn check_daily(&self, key: &str, limit: u32) -> bool {
        let Ok(mut conn) = self.client.get_multiplexed_async_connection().await else {
            return true;
        };

        let date = chrono::Utc::now().format("%Y-%m-%d");
        let k = format!("rate_limit:{}:{}", key, date);
        let count: u32 = conn.incr(&k, 1_u32).await.unwrap_or(0);
        if count == 1 {
            let _: () = conn.expire(&k, 86_400).await.unwrap_or(());
        }
        count <= limit
    }
}
