use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// String key-value store with per-entry expiry
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Stored value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

#[derive(Clone)]
struct CachedEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-process cache used when no Redis address is configured
#[derive(Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CachedEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(cached) if Utc::now() < cached.expires_at => Ok(Some(cached.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheError::Backend(format!("Invalid TTL: {}", e)))?;
        let cached = CachedEntry {
            value: value.to_string(),
            expires_at: Utc::now() + ttl,
        };

        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), cached);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
