use async_trait::async_trait;
use uuid::Uuid;

/// Cache key for a post's like counter.
pub fn likes_count_key(post_id: Uuid) -> String {
    format!("post:{}:likes_count", post_id)
}

/// Cache for denormalized counters.
///
/// Error philosophy: cache failures are degraded, not fatal. Implementations
/// log every failure loudly and fall through, so a broken cache only costs
/// reads from the source, never a failed request.
#[async_trait]
pub trait CounterCache: Send + Sync {
    /// Cached value, or `None` on a miss or any cache failure.
    async fn get_count(&self, key: &str) -> Option<i32>;

    async fn set_count(&self, key: &str, value: i32, ttl_seconds: u64);

    /// Drops a key after the underlying value changed. Called explicitly at
    /// the write site, after the state change committed.
    async fn invalidate(&self, key: &str);
}
