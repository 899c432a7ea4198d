use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod extraction;
pub mod period;
pub mod summary;
pub mod transaction;

pub use extraction::ExtractionError;
pub use period::{Period, UnknownPeriod};
pub use summary::Summary;
pub use transaction::{RefreshResponse, Transaction, TransactionsResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}
