use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Spending for the current period compared with the one before it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: f64,
    pub previous: f64,
    pub change_percentage: f64,
}

impl Summary {
    /// Builds a summary, reporting no change when there is nothing to compare against.
    pub fn compare(total: f64, previous: f64) -> Self {
        let change_percentage = if previous != 0.0 {
            (total - previous) / previous * 100.0
        } else {
            0.0
        };

        Self {
            total,
            previous,
            change_percentage,
        }
    }
}
