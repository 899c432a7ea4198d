use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Reporting period accepted by the `filter` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid filter: {0}")]
pub struct UnknownPeriod(pub String);

impl Period {
    /// Periods warmed by the refresh endpoint, in fetch order.
    pub const REFRESHED: [Period; 3] = [Period::Daily, Period::Weekly, Period::Monthly];

    /// Number of days of mail scanned for this period.
    pub fn lookback_days(self) -> i64 {
        match self {
            Period::Daily => 2,
            Period::Weekly => 14,
            Period::Monthly => 60,
            Period::All => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::All => "all",
        }
    }

    /// Lenient mapping used for summaries: anything unrecognised sums everything.
    pub fn from_keyword(keyword: &str) -> Self {
        keyword.parse().unwrap_or(Period::All)
    }
}

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "all" => Ok(Period::All),
            other => Err(UnknownPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_windows() {
        assert_eq!(Period::Daily.lookback_days(), 2);
        assert_eq!(Period::Weekly.lookback_days(), 14);
        assert_eq!(Period::Monthly.lookback_days(), 60);
        assert_eq!(Period::All.lookback_days(), 90);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!("weekly".parse::<Period>(), Ok(Period::Weekly));
        assert_eq!(
            "yearly".parse::<Period>(),
            Err(UnknownPeriod("yearly".to_string()))
        );
    }

    #[test]
    fn test_from_keyword_falls_back_to_all() {
        assert_eq!(Period::from_keyword("monthly"), Period::Monthly);
        assert_eq!(Period::from_keyword("quarterly"), Period::All);
    }

    #[test]
    fn test_period_serialization() {
        let json = serde_json::to_string(&Period::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
    }
}
