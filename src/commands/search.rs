use crate::args::SearchArgs;
use crate::commands::Out;
use crate::report::search_transactions;
use crate::{import, Result};
use serde_json::{json, Value};
use std::path::Path;

/// Search transaction descriptions and categories for the query text.
pub async fn search(statement: &Path, args: &SearchArgs) -> Result<Out<Value>> {
    let transactions = import::load_statement(statement)?;

    let out = match search_transactions(&transactions, args.query()) {
        Ok(rows) => Out::new(
            format!("Found {} transactions for '{}'", rows.len(), args.query()),
            serde_json::to_value(&rows)?,
        ),
        Err(e) => Out::new(
            format!("Search failed: {e}"),
            json!({"error": e.to_string()}),
        ),
    };

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test;

    #[tokio::test]
    async fn test_search_command() {
        let env = test::TestEnv::new().await;
        let args = SearchArgs::new("колхоз");

        let out = search(&env.statement_path(), &args).await.unwrap();
        let rows = out.structure().unwrap().as_array().unwrap().clone();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|row| row["Описание"] == "Колхоз"));
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty_array() {
        let env = test::TestEnv::new().await;
        let args = SearchArgs::new("аренда");

        let out = search(&env.statement_path(), &args).await.unwrap();
        assert!(out.structure().unwrap().as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_missing_columns_is_error_document() {
        let env = test::TestEnv::new().await;
        let path = env.config().root().join("bare.csv");
        std::fs::write(&path, "Сумма операции\n-100.00\n").unwrap();

        let out = search(&path, &SearchArgs::new("кофе")).await.unwrap();
        assert_eq!(
            out.structure().unwrap()["error"],
            "Отсутствуют необходимые колонки в данных"
        );
    }
}
