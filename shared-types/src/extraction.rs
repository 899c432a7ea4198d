/// Reasons a single email could not be turned into a transaction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no suitable content found in email")]
    NoContent,

    #[error("could not parse transaction details")]
    MissingFields,

    #[error("could not parse amount: {0}")]
    InvalidAmount(String),

    #[error("could not parse date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        assert_eq!(
            ExtractionError::MissingFields.to_string(),
            "could not parse transaction details"
        );
    }
}
