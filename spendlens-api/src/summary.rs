use chrono::{Duration, NaiveDate};
use shared_types::{Period, Summary, Transaction};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SummaryError {
    #[error("no valid transaction dates found")]
    NoDates,

    #[error("no valid transaction months found")]
    NoMonths,
}

/// Aggregates transactions into the current period and the one before it.
///
/// Periods are anchored on the latest transaction date present, not on today.
pub fn summarize(transactions: &[Transaction], period: Period) -> Result<Summary, SummaryError> {
    match period {
        Period::Daily => {
            let (totals, latest) = daily_totals(transactions)?;
            let previous_day = latest - Duration::days(1);
            Ok(Summary::compare(
                totals.get(&latest).copied().unwrap_or_default(),
                totals.get(&previous_day).copied().unwrap_or_default(),
            ))
        }
        Period::Weekly => {
            let (totals, latest) = daily_totals(transactions)?;
            let window_total = |offset: i64| -> f64 {
                (offset..offset + 7)
                    .map(|i| latest - Duration::days(i))
                    .filter_map(|day| totals.get(&day))
                    .sum()
            };
            Ok(Summary::compare(window_total(0), window_total(7)))
        }
        Period::Monthly => {
            let totals = monthly_totals(transactions);
            // Keys are `YYYY-MM`, so string order is calendar order.
            let mut recent = totals.iter().rev();
            let (_, current) = recent.next().ok_or(SummaryError::NoMonths)?;
            let previous = recent.next().map(|(_, total)| *total).unwrap_or_default();
            Ok(Summary::compare(*current, previous))
        }
        Period::All => Ok(Summary {
            total: transactions.iter().map(|t| t.amount).sum(),
            previous: 0.0,
            change_percentage: 0.0,
        }),
    }
}

fn daily_totals(
    transactions: &[Transaction],
) -> Result<(HashMap<NaiveDate, f64>, NaiveDate), SummaryError> {
    let mut totals: HashMap<NaiveDate, f64> = HashMap::new();
    for txn in transactions {
        *totals.entry(txn.date).or_default() += txn.amount;
    }

    let latest = totals.keys().max().copied().ok_or(SummaryError::NoDates)?;
    Ok((totals, latest))
}

fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for txn in transactions {
        *totals.entry(txn.date.format("%Y-%m").to_string()).or_default() += txn.amount;
    }
    totals
}
