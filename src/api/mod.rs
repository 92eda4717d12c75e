//! Clients for the external enrichment APIs: currency exchange rates and stock prices.
//!
//! Both clients sit behind traits so the rest of the program never depends on the concrete HTTP
//! implementations, and so the whole app can run top-to-bottom without network access.

mod rates;
mod stocks;
mod test_client;

use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub(crate) use rates::ExchangeRates;
pub(crate) use stocks::StockQuotes;
pub(crate) use test_client::{TestQuotes, TestRates};

/// Exchange rates are requested against this base currency.
pub(crate) const BASE_CURRENCY: &str = "RUB";

/// One exchange rate, as embedded in the dashboard JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: f64,
}

/// One closing stock price, as embedded in the dashboard JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub stock: String,
    pub price: f64,
}

/// Source of currency exchange rates.
#[async_trait::async_trait]
pub(crate) trait Rates {
    /// Latest rates for the requested currency codes, in request order. Codes the provider does
    /// not know are omitted. A missing API key or a failed request is an error; callers degrade
    /// it to an empty list.
    async fn latest(&self, currencies: &[String]) -> Result<Vec<CurrencyRate>>;
}

/// Source of daily closing stock prices.
#[async_trait::async_trait]
pub(crate) trait Quotes {
    /// Closing prices for the requested symbols on `date`. A symbol with no data for that date
    /// is omitted; a failed request for one symbol never blocks the remaining symbols.
    async fn daily_close(&self, symbols: &[String], date: NaiveDate) -> Result<Vec<StockPrice>>;
}

/// Whether to hit the real provider APIs or use canned in-memory data.
///
/// When `OPSTAT_IN_TEST_MODE` is set and non-zero in length, the mode will be `Mode::Test`,
/// otherwise `Mode::Live`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Live,
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    pub fn from_env() -> Mode {
        match std::env::var("OPSTAT_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Create the exchange-rate client for the given mode.
pub(crate) fn rates(mode: Mode, api_key: Option<String>) -> Box<dyn Rates + Send + Sync> {
    match mode {
        Mode::Live => Box::new(ExchangeRates::new(api_key)),
        Mode::Test => Box::new(TestRates),
    }
}

/// Create the stock-price client for the given mode.
pub(crate) fn quotes(mode: Mode, api_key: Option<String>) -> Box<dyn Quotes + Send + Sync> {
    match mode {
        Mode::Live => Box::new(StockQuotes::new(api_key)),
        Mode::Test => Box::new(TestQuotes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_string_forms() {
        assert_eq!(Mode::Live.to_string(), "live");
        assert_eq!("test".parse::<Mode>().unwrap(), Mode::Test);
    }
}
