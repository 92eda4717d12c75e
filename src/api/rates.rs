//! Implements the `Rates` trait against the apilayer exchangerates_data API.

use crate::api::{CurrencyRate, Rates, BASE_CURRENCY};
use crate::Result;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const RATES_URL: &str = "https://api.apilayer.com/exchangerates_data/latest";

/// Fetches latest exchange rates against [`BASE_CURRENCY`] in a single request for all
/// requested currency codes.
pub(crate) struct ExchangeRates {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRates {
    pub(crate) fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

/// The subset of the provider response we read.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait::async_trait]
impl Rates for ExchangeRates {
    async fn latest(&self, currencies: &[String]) -> Result<Vec<CurrencyRate>> {
        let Some(api_key) = &self.api_key else {
            bail!("The exchange-rate API key is not set");
        };
        if currencies.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(RATES_URL)
            .query(&[
                ("symbols", currencies.join(",")),
                ("base", BASE_CURRENCY.to_string()),
            ])
            .header("apikey", api_key)
            .send()
            .await
            .context("Failed to request exchange rates")?;

        if !response.status().is_success() {
            bail!(
                "The exchange-rate API returned status {}",
                response.status()
            );
        }

        let body: RatesResponse = response
            .json()
            .await
            .context("Failed to parse the exchange-rate response")?;

        // Keep the user's configured order; drop codes the provider did not return
        let rates: Vec<CurrencyRate> = currencies
            .iter()
            .filter_map(|currency| {
                body.rates.get(currency).map(|&rate| CurrencyRate {
                    currency: currency.clone(),
                    rate,
                })
            })
            .collect();

        debug!("Fetched {} of {} exchange rates", rates.len(), currencies.len());
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let client = ExchangeRates::new(None);
        let result = client.latest(&["USD".to_string()]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_empty_currency_list_skips_the_request() {
        let client = ExchangeRates::new(Some("key".to_string()));
        let rates = client.latest(&[]).await.unwrap();
        assert!(rates.is_empty());
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"success": true, "base": "RUB", "rates": {"USD": 0.0112, "EUR": 0.0104}}"#;
        let body: RatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.rates.get("USD"), Some(&0.0112));
        assert_eq!(body.rates.len(), 2);
    }

    #[test]
    fn test_response_without_rates_field() {
        let json = r#"{"success": false}"#;
        let body: RatesResponse = serde_json::from_str(json).unwrap();
        assert!(body.rates.is_empty());
    }
}
