//! Implements the `Rates` and `Quotes` traits using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole app, top-to-bottom, without hitting the provider APIs.

use crate::api::{CurrencyRate, Quotes, Rates, StockPrice};
use crate::Result;
use chrono::NaiveDate;

/// Canned exchange rates keyed by currency code.
const RATE_DATA: &[(&str, f64)] = &[
    ("USD", 0.0112),
    ("EUR", 0.0104),
    ("GBP", 0.0089),
    ("CNY", 0.0806),
    ("JPY", 1.6724),
];

/// Canned daily closing prices keyed by symbol.
const QUOTE_DATA: &[(&str, f64)] = &[
    ("AAPL", 150.12),
    ("AMZN", 3173.18),
    ("GOOGL", 2742.39),
    ("MSFT", 296.71),
    ("TSLA", 1007.08),
];

/// A `Rates` implementation seeded with fixed rates. Codes outside the seed data are omitted,
/// mirroring a provider that does not know them.
pub(crate) struct TestRates;

#[async_trait::async_trait]
impl Rates for TestRates {
    async fn latest(&self, currencies: &[String]) -> Result<Vec<CurrencyRate>> {
        Ok(currencies
            .iter()
            .filter_map(|currency| {
                RATE_DATA
                    .iter()
                    .find(|(code, _)| *code == currency.as_str())
                    .map(|&(_, rate)| CurrencyRate {
                        currency: currency.clone(),
                        rate,
                    })
            })
            .collect())
    }
}

/// A `Quotes` implementation seeded with fixed prices, regardless of the requested date.
pub(crate) struct TestQuotes;

#[async_trait::async_trait]
impl Quotes for TestQuotes {
    async fn daily_close(&self, symbols: &[String], _date: NaiveDate) -> Result<Vec<StockPrice>> {
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                QUOTE_DATA
                    .iter()
                    .find(|(code, _)| *code == symbol.as_str())
                    .map(|&(_, price)| StockPrice {
                        stock: symbol.clone(),
                        price,
                    })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rates_keep_request_order_and_skip_unknown() {
        let rates = TestRates
            .latest(&["EUR".to_string(), "XYZ".to_string(), "USD".to_string()])
            .await
            .unwrap();
        let codes: Vec<&str> = rates.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(codes, vec!["EUR", "USD"]);
    }

    #[tokio::test]
    async fn test_quotes_skip_unknown_symbols() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 25).unwrap();
        let prices = TestQuotes
            .daily_close(&["AAPL".to_string(), "NOPE".to_string()], date)
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].stock, "AAPL");
    }
}
