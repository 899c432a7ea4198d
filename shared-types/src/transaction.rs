use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Summary;

/// A spending transaction parsed out of a single email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
}

/// Response for the transactions endpoint, also the cached payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionsResponse {
    pub summary: Summary,
    pub details: Vec<Transaction>,
}

/// Response for the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RefreshResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serialization() {
        let txn = Transaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            amount: 1234.5,
            description: "Transaction from HTML email".to_string(),
        };

        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["amount"], 1234.5);
        assert_eq!(json["description"], "Transaction from HTML email");
    }

    #[test]
    fn test_response_field_names() {
        let response = TransactionsResponse {
            summary: Summary {
                total: 10.0,
                previous: 5.0,
                change_percentage: 100.0,
            },
            details: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["summary"]["changePercentage"], 100.0);
        assert_eq!(json["summary"]["previous"], 5.0);
        assert!(json["details"].as_array().unwrap().is_empty());
    }
}
