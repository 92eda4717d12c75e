//! Spend-by-category report over a trailing three-month window.

use crate::dates::{self, DateFormat};
use crate::model::{Amount, Transactions};
use crate::report::ReportWindow;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// One output row of the category report. Field names match what report consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    #[serde(rename = "Категория")]
    pub category: String,
    #[serde(rename = "Общая сумма")]
    pub total: Amount,
}

/// Returns spend totals per category over the 90 days trailing `date`, for categories containing
/// `category` case-insensitively.
///
/// `date` accepts `YYYY-MM-DD[ HH:MM:SS]`. A malformed reference date is reported and yields an
/// empty result set rather than an error. Rows with unparseable operation dates are excluded.
/// Totals keep the sign stored in the statement. Output rows are sorted by category name so that
/// repeated runs on the same input are byte-identical.
pub fn spending_by_category(
    transactions: &Transactions,
    category: &str,
    date: &str,
) -> Vec<CategorySpend> {
    let Some(end) = dates::parse_date_time(date, DateFormat::YearMonthDay) else {
        error!("Invalid reference date '{date}', expected YYYY-MM-DD[ HH:MM:SS]");
        return Vec::new();
    };
    let window = ReportWindow::trailing_days(end, 90);

    let query = category.to_lowercase();
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut matched = 0usize;

    for dated in dates::normalize(transactions, DateFormat::DayMonthYear) {
        if !window.contains(dated.at) {
            continue;
        }
        if !dated.txn.category().to_lowercase().contains(&query) {
            continue;
        }
        let amount = match dated.txn.amount() {
            Ok(a) => a,
            Err(e) => {
                warn!(
                    "Skipping row with unparseable amount '{}': {e}",
                    dated.txn.amount
                );
                continue;
            }
        };
        *totals
            .entry(dated.txn.category().to_string())
            .or_insert(Decimal::ZERO) += amount.value();
        matched += 1;
    }

    info!("Category report matched {matched} transactions for '{category}'");

    totals
        .into_iter()
        .map(|(category, total)| CategorySpend {
            category,
            total: Amount::new(total),
        })
        .collect()
}
