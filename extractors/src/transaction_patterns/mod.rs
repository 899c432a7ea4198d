mod extractor;

pub use extractor::TransactionExtractor;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{ExtractionError, Transaction};

pub const DEFAULT_AMOUNT_PATTERN: &str = r"(?i)\bRs\.?\s*\$?([0-9][0-9,]*(?:\.[0-9]+)?)";
pub const DEFAULT_DATE_PATTERN: &str = r"\bon\s+(\d{2}-\d{2}-\d{2})\b";
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%y";
pub const DEFAULT_DESCRIPTION: &str = "Transaction from HTML email";

/// Pattern set as it appears in the `[patterns]` config section.
///
/// Both regexes must capture the interesting token in group 1.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PatternConfig {
    pub amount: String,
    pub date: String,
    pub date_format: String,
    pub description: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT_PATTERN.to_string(),
            date: DEFAULT_DATE_PATTERN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Compiled amount and date patterns applied to stripped email text
#[derive(Debug, Clone)]
pub struct TransactionPatterns {
    amount: Regex,
    date: Regex,
    date_format: String,
    description: String,
}

impl TransactionPatterns {
    pub fn from_config(config: &PatternConfig) -> Result<Self, ExtractionError> {
        let amount = compile_with_group("amount", &config.amount)?;
        let date = compile_with_group("date", &config.date)?;

        if config.date_format.trim().is_empty() {
            return Err(ExtractionError::ConfigError(
                "date_format must not be empty".to_string(),
            ));
        }

        Ok(Self {
            amount,
            date,
            date_format: config.date_format.clone(),
            description: config.description.clone(),
        })
    }

    /// Pulls amount and date out of `text`; both must be present.
    pub fn extract(&self, text: &str) -> Result<Transaction, ExtractionError> {
        let amount_match = self.amount.captures(text).and_then(|c| c.get(1));
        let date_match = self.date.captures(text).and_then(|c| c.get(1));

        let (amount_str, date_str) = match (amount_match, date_match) {
            (Some(amount), Some(date)) => (amount.as_str(), date.as_str()),
            _ => return Err(ExtractionError::MissingFields),
        };

        Ok(Transaction {
            date: self.parse_date(date_str)?,
            amount: parse_amount(amount_str)?,
            description: self.description.clone(),
        })
    }

    fn parse_date(&self, date_str: &str) -> Result<NaiveDate, ExtractionError> {
        NaiveDate::parse_from_str(date_str.trim(), &self.date_format)
            .map_err(|e| ExtractionError::InvalidDate(format!("{date_str:?}: {e}")))
    }
}

impl Default for TransactionPatterns {
    fn default() -> Self {
        Self::from_config(&PatternConfig::default()).expect("default transaction patterns compile")
    }
}

fn compile_with_group(field: &str, pattern: &str) -> Result<Regex, ExtractionError> {
    let regex = Regex::new(pattern).map_err(|e| {
        ExtractionError::ConfigError(format!("Invalid {field} pattern: {e}"))
    })?;

    if regex.captures_len() < 2 {
        return Err(ExtractionError::ConfigError(format!(
            "{field} pattern needs a capture group for the value"
        )));
    }

    Ok(regex)
}

/// Parses a decimal amount, ignoring thousands separators.
pub fn parse_amount(amount_str: &str) -> Result<f64, ExtractionError> {
    let cleaned = amount_str.replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        Ok(_) => Err(ExtractionError::InvalidAmount(amount_str.to_string())),
        Err(e) => Err(ExtractionError::InvalidAmount(format!("{amount_str:?}: {e}"))),
    }
}
