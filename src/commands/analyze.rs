use crate::api::{self, Mode};
use crate::args::AnalyzeArgs;
use crate::commands::Out;
use crate::report::{search_transactions, spending_by_category};
use crate::{import, views, Config, Result};
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::warn;

/// Run search, category report and dashboard over one statement and emit a combined document.
///
/// The search and report sections are empty when their inputs are not supplied. A dashboard that
/// cannot be composed contributes an empty object; the other sections are still produced.
pub async fn analyze(
    config: &Config,
    statement: &Path,
    args: &AnalyzeArgs,
    mode: Mode,
) -> Result<Out<Value>> {
    let transactions = import::load_statement(statement)?;

    let search_section = match args.query() {
        Some(query) => match search_transactions(&transactions, query) {
            Ok(rows) => serde_json::to_value(&rows)?,
            Err(e) => json!({"error": e.to_string()}),
        },
        None => json!([]),
    };

    let report_section = match args.category() {
        Some(category) => {
            serde_json::to_value(spending_by_category(&transactions, category, args.date()))?
        }
        None => json!([]),
    };

    let rates = api::rates(mode, config.rates_api_key().map(str::to_string));
    let quotes = api::quotes(mode, config.stocks_api_key().map(str::to_string));
    let dashboard_section = match views::build_dashboard(
        &transactions,
        args.date(),
        rates.as_ref(),
        quotes.as_ref(),
        config.settings(),
    )
    .await
    {
        Ok(dashboard) => serde_json::to_value(&dashboard)?,
        Err(e) => {
            warn!("Dashboard could not be composed: {e:#}");
            json!({})
        }
    };

    let mut document = Map::new();
    document.insert("search_transactions".to_string(), search_section);
    document.insert("spending_by_category".to_string(), report_section);
    document.insert("dashboard".to_string(), dashboard_section);

    Ok(Out::new(
        format!("Analysis for {}", args.date()),
        Value::Object(document),
    ))
}
