use chrono::{Duration, NaiveDate, Utc};
use extractors::TransactionExtractor;
use shared_types::{ExtractionError, Transaction};
use std::sync::Arc;

use crate::integrations::{MailProvider, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("unauthorized: insufficient authentication scopes: {0}")]
    Unauthorized(String),

    #[error("unable to retrieve messages: {0}")]
    Upstream(String),
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        if err.is_unauthorized() {
            FetchError::Unauthorized(err.to_string())
        } else {
            FetchError::Upstream(err.to_string())
        }
    }
}

/// Transactions that parsed, plus how many matching messages did not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub parsed: Vec<Transaction>,
    pub skipped: usize,
}

pub struct TransactionFetcher {
    provider: Arc<dyn MailProvider>,
    extractor: Arc<TransactionExtractor>,
    subject_keywords: Vec<String>,
}

impl TransactionFetcher {
    pub fn new(
        provider: Arc<dyn MailProvider>,
        extractor: Arc<TransactionExtractor>,
        subject_keywords: &[String],
    ) -> Self {
        Self {
            provider,
            extractor,
            subject_keywords: subject_keywords.to_vec(),
        }
    }

    /// Scans the last `days` days of mail, up to and including today.
    pub async fn fetch(&self, days: i64) -> Result<FetchOutcome, FetchError> {
        self.fetch_as_of(Utc::now().date_naive(), days).await
    }

    pub async fn fetch_as_of(&self, today: NaiveDate, days: i64) -> Result<FetchOutcome, FetchError> {
        let query = build_search_query(today, days, &self.subject_keywords);
        let message_ids = self.provider.list_message_ids(&query).await?;

        let mut outcome = FetchOutcome::default();
        for message_id in &message_ids {
            match self.fetch_one(message_id).await {
                Ok(transaction) => outcome.parsed.push(transaction),
                Err(e) => {
                    tracing::warn!("Skipping message {}: {}", message_id, e);
                    outcome.skipped += 1;
                }
            }
        }

        tracing::info!(
            "Parsed {} transactions from {} messages over {} days ({} skipped)",
            outcome.parsed.len(),
            message_ids.len(),
            days,
            outcome.skipped
        );

        Ok(outcome)
    }

    async fn fetch_one(&self, message_id: &str) -> Result<Transaction, SkipReason> {
        let message = self.provider.get_message(message_id).await?;
        let payload = message.payload.ok_or(ExtractionError::NoContent)?;
        Ok(self.extractor.extract_from_message(&payload)?)
    }
}

#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("error getting message: {0}")]
    Fetch(#[from] ProviderError),

    #[error("error parsing message: {0}")]
    Parse(#[from] ExtractionError),
}

/// Gmail search covering `[today - days, today]` restricted to the subject keywords.
pub fn build_search_query(today: NaiveDate, days: i64, subject_keywords: &[String]) -> String {
    let start = today - Duration::days(days);
    // `before:` is exclusive
    let end = today + Duration::days(1);

    let subjects = subject_keywords
        .iter()
        .map(|keyword| {
            if keyword.contains(char::is_whitespace) {
                format!("\"{}\"", keyword)
            } else {
                keyword.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        "after:{} before:{} subject:({})",
        start.format("%Y/%m/%d"),
        end.format("%Y/%m/%d"),
        subjects
    )
}
