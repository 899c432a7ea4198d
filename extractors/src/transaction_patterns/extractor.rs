use crate::markup::strip_markup;
use crate::mime_content::{extract_message_content, MessagePart};
use crate::transaction_patterns::{PatternConfig, TransactionPatterns};
use shared_types::{ExtractionError, Transaction};

/// Turns a fetched email into a transaction: content, then markup, then fields.
#[derive(Debug, Clone, Default)]
pub struct TransactionExtractor {
    patterns: TransactionPatterns,
}

impl TransactionExtractor {
    pub fn new(patterns: TransactionPatterns) -> Self {
        Self { patterns }
    }

    pub fn from_config(config: &PatternConfig) -> Result<Self, ExtractionError> {
        Ok(Self::new(TransactionPatterns::from_config(config)?))
    }

    pub fn extract_from_message(&self, payload: &MessagePart) -> Result<Transaction, ExtractionError> {
        let body = extract_message_content(payload);
        if body.is_empty() {
            return Err(ExtractionError::NoContent);
        }

        self.extract_from_text(&body)
    }

    pub fn extract_from_text(&self, body: &str) -> Result<Transaction, ExtractionError> {
        let text = strip_markup(body);
        self.patterns.extract(&text)
    }
}
