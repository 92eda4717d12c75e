//! Implements the `Quotes` trait against the Alpha Vantage TIME_SERIES_DAILY API.

use crate::api::{Quotes, StockPrice};
use crate::Result;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

const QUOTES_URL: &str = "https://www.alphavantage.co/query";

/// Delay inserted after a failed request before trying the next symbol. Simple throttling, not a
/// backoff policy.
const FAILURE_DELAY: Duration = Duration::from_secs(1);

/// Fetches daily closing prices one symbol at a time, accumulating whatever succeeds.
pub(crate) struct StockQuotes {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl StockQuotes {
    pub(crate) fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_symbol(&self, symbol: &str, api_key: &str) -> Result<Value> {
        let response = self
            .client
            .get(QUOTES_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to request a quote for {symbol}"))?;

        if !response.status().is_success() {
            bail!(
                "The stock-price API returned status {} for {symbol}",
                response.status()
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse the quote response for {symbol}"))
    }
}

#[async_trait::async_trait]
impl Quotes for StockQuotes {
    async fn daily_close(&self, symbols: &[String], date: NaiveDate) -> Result<Vec<StockPrice>> {
        let Some(api_key) = &self.api_key else {
            bail!("The stock-price API key is not set");
        };

        let date_key = date.format("%Y-%m-%d").to_string();
        let mut prices = Vec::new();

        for symbol in symbols {
            let data = match self.fetch_symbol(symbol, api_key).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Quote request for {symbol} failed: {e:#}");
                    tokio::time::sleep(FAILURE_DELAY).await;
                    continue;
                }
            };

            match close_on_date(&data, &date_key) {
                Some(price) => prices.push(StockPrice {
                    stock: symbol.clone(),
                    price,
                }),
                None => report_missing(symbol, &date_key, &data),
            }
        }

        debug!("Fetched {} of {} stock prices", prices.len(), symbols.len());
        Ok(prices)
    }
}

/// Extract the closing price for `date_key` from a TIME_SERIES_DAILY response body.
fn close_on_date(data: &Value, date_key: &str) -> Option<f64> {
    data.get("Time Series (Daily)")?
        .get(date_key)?
        .get("4. close")?
        .as_str()?
        .parse()
        .ok()
}

fn report_missing(symbol: &str, date_key: &str, data: &Value) {
    if data.get("Time Series (Daily)").is_some() {
        warn!("No data for {symbol} on {date_key}");
    } else if let Some(info) = data.get("Information").and_then(Value::as_str) {
        error!("Quote provider rejected the request for {symbol}: {info}");
    } else {
        let message = data
            .get("Error Message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        error!("Bad quote data for {symbol}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let client = StockQuotes::new(None);
        let date = NaiveDate::from_ymd_opt(2024, 7, 25).unwrap();
        assert!(client.daily_close(&["AAPL".to_string()], date).await.is_err());
    }

    #[test]
    fn test_close_on_date() {
        let data = json!({
            "Time Series (Daily)": {
                "2024-07-25": {"1. open": "223.00", "4. close": "217.49"},
                "2024-07-24": {"1. open": "224.00", "4. close": "218.54"},
            }
        });
        assert_eq!(close_on_date(&data, "2024-07-25"), Some(217.49));
    }

    #[test]
    fn test_close_on_missing_date() {
        let data = json!({
            "Time Series (Daily)": {
                "2024-07-24": {"4. close": "218.54"},
            }
        });
        assert_eq!(close_on_date(&data, "2024-07-25"), None);
    }

    #[test]
    fn test_close_on_error_body() {
        let data = json!({"Error Message": "Invalid API call."});
        assert_eq!(close_on_date(&data, "2024-07-25"), None);
    }
}
