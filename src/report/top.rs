//! Top-5 transactions for the month-to-date window.

use crate::dates::{self, DateFormat, REFERENCE_FORMAT};
use crate::model::{Amount, Transactions};
use crate::report::ReportWindow;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::warn;

const TOP_N: usize = 5;

/// One row of the top-transactions list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTransaction {
    pub date: String,
    pub amount: Amount,
    pub category: String,
    pub description: String,
}

/// The top-transactions list, shaped the way the dashboard JSON embeds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopTransactions {
    pub top_transactions: Vec<TopTransaction>,
}

/// The reference timestamp did not match the strict `YYYY-MM-DD HH:MM:SS` format.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReferenceDateError(String);

impl Display for ReferenceDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid reference timestamp '{}': expected format {}",
            self.0, REFERENCE_FORMAT
        )
    }
}

impl Error for ReferenceDateError {}

/// Returns the five largest transactions, by amount descending, between the first instant of the
/// reference month and the reference timestamp itself.
///
/// The sort is stable: transactions with equal amounts keep their original statement order. Zero
/// matches yield an empty list, not an error. A malformed `date_time` is reported to the caller
/// as a structured error.
pub fn top_transactions(
    transactions: &Transactions,
    date_time: &str,
) -> Result<TopTransactions, ReferenceDateError> {
    let reference = dates::parse_reference(date_time)
        .map_err(|_| ReferenceDateError(date_time.to_string()))?;
    let window = ReportWindow::month_to_date(reference);

    let mut rows = Vec::new();
    for dated in dates::normalize(transactions, DateFormat::DayMonthYear) {
        if !window.contains(dated.at) {
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
        rows.push((
            amount.value(),
            TopTransaction {
                date: dated.at.format("%d.%m.%Y").to_string(),
                amount,
                category: dated.txn.category().to_string(),
                description: dated.txn.description().to_string(),
            },
        ));
    }

    // Stable sort: ties preserve original statement order
    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.truncate(TOP_N);

    Ok(TopTransactions {
        top_transactions: rows.into_iter().map(|(_, row)| row).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transactions;
    use rust_decimal::Decimal;

    fn sample() -> Transactions {
        Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции", "Категория", "Описание"],
            vec!["2024-07-01 10:00:00", "150.00", "Еда", "Покупка продуктов"],
            vec!["2024-07-05 12:00:00", "200.00", "Транспорт", "Такси"],
            vec!["2024-07-10 09:00:00", "50.00", "Одежда", "Новая куртка"],
            vec!["2024-07-15 14:00:00", "300.00", "Кафе", "Обед с друзьями"],
            vec!["2024-07-20 16:00:00", "400.00", "Развлечения", "Билет в кино"],
            vec!["2024-07-25 11:00:00", "250.00", "Путешествия", "Поездка в горы"],
        ])
        .unwrap()
    }

    #[test]
    fn test_returns_at_most_five_sorted_descending() {
        let report = top_transactions(&sample(), "2024-07-25 11:00:00").unwrap();
        let rows = &report.top_transactions;
        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[0].amount.value() >= pair[1].amount.value());
        }
        assert_eq!(rows[0].amount.value(), Decimal::from(400));
        assert_eq!(rows[0].date, "20.07.2024");
        assert_eq!(rows[0].category, "Развлечения");
    }

    #[test]
    fn test_window_excludes_rows_after_reference() {
        let report = top_transactions(&sample(), "2024-07-15 14:00:00").unwrap();
        let rows = &report.top_transactions;
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.date != "20.07.2024"));
    }

    #[test]
    fn test_no_data_in_range_is_empty_list() {
        let txns = Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции", "Категория", "Описание"],
            vec!["2024-06-01 10:00:00", "150.00", "Еда", "Покупка продуктов"],
            vec!["2024-06-15 12:00:00", "200.00", "Транспорт", "Такси"],
        ])
        .unwrap();
        let report = top_transactions(&txns, "2024-07-01 10:00:00").unwrap();
        assert!(report.top_transactions.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"top_transactions": []}));
    }

    #[test]
    fn test_malformed_reference_is_reported_error() {
        let err = top_transactions(&sample(), "2024-07-25").unwrap_err();
        assert!(err.to_string().contains("2024-07-25"));
        assert!(err.to_string().contains("%Y-%m-%d %H:%M:%S"));
    }

    #[test]
    fn test_ties_preserve_statement_order() {
        let txns = Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции", "Категория", "Описание"],
            vec!["2024-07-01 10:00:00", "100.00", "Еда", "первая"],
            vec!["2024-07-02 10:00:00", "100.00", "Еда", "вторая"],
            vec!["2024-07-03 10:00:00", "100.00", "Еда", "третья"],
        ])
        .unwrap();
        let report = top_transactions(&txns, "2024-07-25 11:00:00").unwrap();
        let descriptions: Vec<&str> = report
            .top_transactions
            .iter()
            .map(|r| r.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["первая", "вторая", "третья"]);
    }

    #[test]
    fn test_statement_format_dates_also_accepted() {
        let txns = Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции", "Категория", "Описание"],
            vec!["20.07.2024 16:00:00", "400.00", "Развлечения", "Билет в кино"],
        ])
        .unwrap();
        let report = top_transactions(&txns, "2024-07-25 11:00:00").unwrap();
        assert_eq!(report.top_transactions.len(), 1);
        assert_eq!(report.top_transactions[0].date, "20.07.2024");
    }
}
