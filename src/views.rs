//! The composed dashboard view: greeting, card summary, top transactions and enrichment data.

use crate::api::{CurrencyRate, Quotes, Rates, StockPrice};
use crate::dates;
use crate::model::Transactions;
use crate::report::{self, TopTransaction};
use crate::{Result, UserSettings};
use anyhow::Context;
use chrono::Timelike;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Returns the greeting for the hour of `date_time` (strict `YYYY-MM-DD HH:MM:SS`).
pub fn greeting(date_time: &str) -> Result<&'static str> {
    let reference = dates::parse_reference(date_time)
        .with_context(|| format!("Invalid reference timestamp '{date_time}'"))?;
    Ok(greeting_for_hour(reference.hour()))
}

/// Boundary hours belong to the bucket they open: 6 is morning, 12 is day, 18 is evening and
/// 22 is night.
fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        6..=11 => "Доброе утро",
        12..=17 => "Добрый день",
        18..=21 => "Добрый вечер",
        _ => "Доброй ночи",
    }
}

/// The dashboard JSON document, with the exact field names its consumers rely on.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub greeting: String,
    /// The card summary object, or an empty object when the summary could not be computed.
    pub cards: Value,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: Vec<CurrencyRate>,
    pub stock_prices: Vec<StockPrice>,
}

/// Composes the dashboard for the given reference timestamp.
///
/// Each sub-view degrades independently: a failing card summary contributes an empty object, a
/// failing top-transactions computation or enrichment lookup contributes an empty list, and the
/// rest of the dashboard is still produced. Only an unusable reference timestamp is
/// catastrophic, because every date-windowed view depends on it; the caller reports that as a
/// single `{"error": ...}` document.
pub(crate) async fn build_dashboard(
    transactions: &Transactions,
    date_time: &str,
    rates: &(dyn Rates + Send + Sync),
    quotes: &(dyn Quotes + Send + Sync),
    settings: &UserSettings,
) -> Result<Dashboard> {
    let greeting = greeting(date_time)?;
    let reference = dates::parse_reference(date_time)?;

    let cards = match report::card_summary(transactions) {
        Ok(summary) => serde_json::to_value(&summary)?,
        Err(e) => {
            warn!("Card summary unavailable: {e}");
            Value::Object(serde_json::Map::new())
        }
    };

    let top_transactions = match report::top_transactions(transactions, date_time) {
        Ok(top) => top.top_transactions,
        Err(e) => {
            warn!("Top transactions unavailable: {e}");
            Vec::new()
        }
    };

    let currency_rates = match rates.latest(settings.user_currencies()).await {
        Ok(rates) => rates,
        Err(e) => {
            warn!("Exchange rates unavailable: {e:#}");
            Vec::new()
        }
    };

    let stock_prices = match quotes.daily_close(settings.user_stocks(), reference.date()).await {
        Ok(prices) => prices,
        Err(e) => {
            warn!("Stock prices unavailable: {e:#}");
            Vec::new()
        }
    };

    Ok(Dashboard {
        greeting: greeting.to_string(),
        cards,
        top_transactions,
        currency_rates,
        stock_prices,
    })
}
