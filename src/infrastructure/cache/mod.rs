pub mod redis_counter_cache;
pub mod traits;
