use extractors::TransactionExtractor;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::helpers::response_cache::ResponseCache;
use crate::helpers::transaction_cache::TransactionCache;
use crate::integrations::MailProviderFactory;
use crate::jobs::transaction_fetcher::TransactionFetcher;

/// Everything request handlers share, handed to actix as `web::Data<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub cache: TransactionCache,
    pub providers: Arc<dyn MailProviderFactory>,
    pub extractor: Arc<TransactionExtractor>,
    pub subject_keywords: Arc<Vec<String>>,
    pub on_demand_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl AppState {
    pub fn new(
        config: &ApiConfig,
        cache: Arc<dyn ResponseCache>,
        providers: Arc<dyn MailProviderFactory>,
        extractor: Arc<TransactionExtractor>,
    ) -> Self {
        Self {
            cache: TransactionCache::new(cache),
            providers,
            extractor,
            subject_keywords: Arc::new(config.gmail.subject_keywords.clone()),
            on_demand_ttl: Duration::from_secs(config.cache.on_demand_ttl_secs),
            refresh_ttl: Duration::from_secs(config.cache.refresh_ttl_secs),
        }
    }

    /// Fetcher bound to the caller's mailbox.
    pub fn fetcher(&self, access_token: &str) -> TransactionFetcher {
        TransactionFetcher::new(
            self.providers.for_token(access_token),
            self.extractor.clone(),
            &self.subject_keywords,
        )
    }
}
