pub mod redis_cache;
pub mod response_cache;
pub mod transaction_cache;
