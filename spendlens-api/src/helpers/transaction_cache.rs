use shared_types::{Period, TransactionsResponse};
use std::sync::Arc;
use std::time::Duration;

use super::response_cache::ResponseCache;

pub fn cache_key(period: Period) -> String {
    format!("transactions:{}", period)
}

/// Best-effort caching of transaction responses keyed by period.
///
/// Backend and decoding failures are logged and read as misses; nothing here
/// fails a request.
#[derive(Clone)]
pub struct TransactionCache {
    backend: Arc<dyn ResponseCache>,
}

impl TransactionCache {
    pub fn new(backend: Arc<dyn ResponseCache>) -> Self {
        Self { backend }
    }

    /// Cached JSON body exactly as it was stored.
    pub async fn lookup(&self, period: Period) -> Option<String> {
        let key = cache_key(period);

        let cached = match self.backend.get(&key).await {
            Ok(Some(cached)) => cached,
            Ok(None) => {
                tracing::info!("Cache miss for filter: {}", period);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}, treating as miss: {}", key, e);
                return None;
            }
        };

        if let Err(e) = serde_json::from_str::<TransactionsResponse>(&cached) {
            tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
            return None;
        }

        tracing::info!("Cache hit for filter: {}", period);
        Some(cached)
    }

    pub async fn store(&self, period: Period, response: &TransactionsResponse, ttl: Duration) {
        let key = cache_key(period);

        let body = match serde_json::to_string(response) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Error marshalling {} response: {}", period, e);
                return;
            }
        };

        if let Err(e) = self.backend.set(&key, &body, ttl).await {
            tracing::error!("Error setting cache for {}: {}", key, e);
        }
    }

    pub async fn is_healthy(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Cache health check failed: {}", e);
                false
            }
        }
    }
}
