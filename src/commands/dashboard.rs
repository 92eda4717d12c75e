use crate::api::{self, Mode};
use crate::args::DashboardArgs;
use crate::commands::Out;
use crate::{import, views, Config, Result};
use serde_json::{json, Value};
use std::path::Path;
use tracing::warn;

/// Build the dashboard document for the reference timestamp in `args`.
///
/// An unreadable statement file is fatal. A catastrophic composition failure (for example a
/// malformed reference timestamp) is reported as a single `{"error": ...}` document instead.
pub async fn dashboard(
    config: &Config,
    statement: &Path,
    args: &DashboardArgs,
    mode: Mode,
) -> Result<Out<Value>> {
    let transactions = import::load_statement(statement)?;

    let rates = api::rates(mode, config.rates_api_key().map(str::to_string));
    let quotes = api::quotes(mode, config.stocks_api_key().map(str::to_string));

    let document = match views::build_dashboard(
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
            json!({"error": e.to_string()})
        }
    };

    Ok(Out::new(format!("Dashboard for {}", args.date()), document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test;

    #[tokio::test]
    async fn test_dashboard_command_end_to_end() {
        let env = test::TestEnv::new().await;
        let args = DashboardArgs::new("2021-12-31 08:30:00");

        let out = dashboard(&env.config(), &env.statement_path(), &args, Mode::Test)
            .await
            .unwrap();
        let document = out.structure().unwrap();

        assert_eq!(document["greeting"], "Доброе утро");
        assert_eq!(document["cards"]["last_digits"], "7197");
        assert_eq!(document["currency_rates"][0]["currency"], "USD");
        assert_eq!(document["stock_prices"][0]["stock"], "AAPL");
    }

    #[tokio::test]
    async fn test_bad_reference_produces_error_document() {
        let env = test::TestEnv::new().await;
        let args = DashboardArgs::new("31.12.2021");

        let out = dashboard(&env.config(), &env.statement_path(), &args, Mode::Test)
            .await
            .unwrap();
        let document = out.structure().unwrap();
        assert!(document.get("error").is_some());
    }

    #[tokio::test]
    async fn test_missing_statement_file_is_fatal() {
        let env = test::TestEnv::new().await;
        let args = DashboardArgs::new("2021-12-31 08:30:00");

        let missing = env.config().root().join("нет.csv");
        let result = dashboard(&env.config(), &missing, &args, Mode::Test).await;
        assert!(result.is_err());
    }
}
