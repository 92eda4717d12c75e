//! Reads a bank-statement export (CSV) into a `Transactions` table.

use crate::model::Transactions;
use crate::Result;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Load a statement export. A missing or unreadable file is fatal; per-row problems (bad dates,
/// bad amounts) are not detected here and are handled row-by-row in the views that care.
pub(crate) fn load_statement(path: &Path) -> Result<Transactions> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Unable to open statement file {}", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record =
            result.with_context(|| format!("Corrupt statement file {}", path.display()))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    let transactions = Transactions::parse(rows)
        .with_context(|| format!("Malformed statement file {}", path.display()))?;
    info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "\
Дата операции,Номер карты,Сумма операции,Категория,Описание
31.12.2021 16:44:00,*7197,-160.89,Супермаркеты,Колхоз
31.12.2021 16:42:04,*7197,-64.00,Супермаркеты,Колхоз
";

    #[test]
    fn test_load_statement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("operations.csv");
        std::fs::write(&path, STATEMENT).unwrap();

        let transactions = load_statement(&path).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions.data()[0].card_number(), "*7197");
        assert_eq!(transactions.data()[1].description(), "Колхоз");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_statement(&dir.path().join("нет.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_rows_shorter_than_header_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("operations.csv");
        std::fs::write(
            &path,
            "Дата операции,Сумма операции,Категория\n01.07.2024,-100.00\n",
        )
        .unwrap();

        let transactions = load_statement(&path).unwrap();
        assert_eq!(transactions.data()[0].category(), "");
    }
}
