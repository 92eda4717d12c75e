use crate::model::mapping::Mapping;
use crate::model::{Amount, AmountError};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// A row rendered back into its original column order with all fields verbatim.
pub type Record = serde_json::Map<String, Value>;

/// Represents the rows of a statement export, including the header mapping.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transactions {
    mapping: Mapping,
    data: Vec<Transaction>,
}

impl Transactions {
    /// Given the rows of a statement export, parse the header row and data rows into a
    /// `Transactions` table. Insertion order is file order; rows are never reordered.
    pub fn parse<S, R>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = rows.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row.into_iter())?,
            None => bail!("An empty data set cannot be parsed into a Transactions table"),
        };

        let len = mapping.len();
        let mut transactions = Vec::new();

        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.len() > len {
                bail!(
                    "A row longer than the headers list was encountered at row {}",
                    row_ix + 2
                );
            }
            transactions.push(Transaction::new_with_headers(mapping.headers(), values)?);
        }

        Ok(Self {
            mapping,
            data: transactions,
        })
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Renders every row back into its original column order with all fields verbatim.
    pub fn records(&self) -> Vec<Record> {
        self.data
            .iter()
            .map(|txn| txn.to_record(&self.mapping))
            .collect()
    }
}

/// Represents a single row from a statement export. Known columns are typed fields; anything
/// else lands in `other_fields` so a row can be reproduced without loss.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) operation_date: String,
    pub(crate) payment_date: String,
    pub(crate) card_number: String,
    pub(crate) status: String,
    pub(crate) amount: String,
    pub(crate) currency: String,
    pub(crate) payment_amount: String,
    pub(crate) payment_currency: String,
    pub(crate) cashback: String,
    pub(crate) category: String,
    pub(crate) mcc: String,
    pub(crate) description: String,
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Transaction {
    pub fn new_with_headers<S1, S2, I>(headers: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut transaction = Transaction::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let header = headers
                .get(ix)
                .with_context(|| format!("No header found for column index {ix}"))?
                .as_ref();
            transaction.set_with_header(header, value);
        }
        Ok(transaction)
    }

    pub fn set_with_header<S1, S2>(&mut self, header: S1, value: S2)
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let header = header.as_ref();
        let value = value.into();

        match TransactionColumn::from_header(header) {
            Some(col) => match col {
                TransactionColumn::OperationDate => self.operation_date = value,
                TransactionColumn::PaymentDate => self.payment_date = value,
                TransactionColumn::CardNumber => self.card_number = value,
                TransactionColumn::Status => self.status = value,
                TransactionColumn::Amount => self.amount = value,
                TransactionColumn::Currency => self.currency = value,
                TransactionColumn::PaymentAmount => self.payment_amount = value,
                TransactionColumn::PaymentCurrency => self.payment_currency = value,
                TransactionColumn::Cashback => self.cashback = value,
                TransactionColumn::Category => self.category = value,
                TransactionColumn::Mcc => self.mcc = value,
                TransactionColumn::Description => self.description = value,
            },
            None => {
                let _ = self.other_fields.insert(header.to_string(), value);
            }
        }
    }

    /// Given the header name, retrieve the field value as it appeared in the export.
    pub fn get_by_header(&self, header: &str) -> String {
        match TransactionColumn::from_header(header) {
            Some(col) => match col {
                TransactionColumn::OperationDate => self.operation_date.clone(),
                TransactionColumn::PaymentDate => self.payment_date.clone(),
                TransactionColumn::CardNumber => self.card_number.clone(),
                TransactionColumn::Status => self.status.clone(),
                TransactionColumn::Amount => self.amount.clone(),
                TransactionColumn::Currency => self.currency.clone(),
                TransactionColumn::PaymentAmount => self.payment_amount.clone(),
                TransactionColumn::PaymentCurrency => self.payment_currency.clone(),
                TransactionColumn::Cashback => self.cashback.clone(),
                TransactionColumn::Category => self.category.clone(),
                TransactionColumn::Mcc => self.mcc.clone(),
                TransactionColumn::Description => self.description.clone(),
            },
            None => self
                .other_fields
                .get(header)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Renders the row back into its original column order, with every value verbatim.
    pub fn to_record(&self, mapping: &Mapping) -> Record {
        let mut record = Record::new();
        for header in mapping.headers() {
            record.insert(
                header.as_ref().to_string(),
                Value::String(self.get_by_header(header.as_ref())),
            );
        }
        record
    }

    /// Parses the operation amount. The raw string is kept on the row so that search results can
    /// reproduce it verbatim.
    pub fn amount(&self) -> std::result::Result<Amount, AmountError> {
        Amount::from_str(&self.amount)
    }

    pub fn operation_date(&self) -> &str {
        &self.operation_date
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Represents the known columns of a statement export.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TransactionColumn {
    #[default]
    OperationDate,
    PaymentDate,
    CardNumber,
    Status,
    Amount,
    Currency,
    PaymentAmount,
    PaymentCurrency,
    Cashback,
    Category,
    Mcc,
    Description,
}

impl TransactionColumn {
    pub fn from_header(header: impl AsRef<str>) -> Option<TransactionColumn> {
        match header.as_ref() {
            OPERATION_DATE_STR => Some(TransactionColumn::OperationDate),
            PAYMENT_DATE_STR => Some(TransactionColumn::PaymentDate),
            CARD_NUMBER_STR => Some(TransactionColumn::CardNumber),
            STATUS_STR => Some(TransactionColumn::Status),
            AMOUNT_STR => Some(TransactionColumn::Amount),
            CURRENCY_STR => Some(TransactionColumn::Currency),
            PAYMENT_AMOUNT_STR => Some(TransactionColumn::PaymentAmount),
            PAYMENT_CURRENCY_STR => Some(TransactionColumn::PaymentCurrency),
            CASHBACK_STR => Some(TransactionColumn::Cashback),
            CATEGORY_STR => Some(TransactionColumn::Category),
            MCC_STR => Some(TransactionColumn::Mcc),
            DESCRIPTION_STR => Some(TransactionColumn::Description),
            _ => None,
        }
    }
}

pub const OPERATION_DATE_STR: &str = "Дата операции";
pub const PAYMENT_DATE_STR: &str = "Дата платежа";
pub const CARD_NUMBER_STR: &str = "Номер карты";
pub const STATUS_STR: &str = "Статус";
pub const AMOUNT_STR: &str = "Сумма операции";
pub const CURRENCY_STR: &str = "Валюта операции";
pub const PAYMENT_AMOUNT_STR: &str = "Сумма платежа";
pub const PAYMENT_CURRENCY_STR: &str = "Валюта платежа";
pub const CASHBACK_STR: &str = "Кэшбэк";
pub const CATEGORY_STR: &str = "Категория";
pub const MCC_STR: &str = "MCC";
pub const DESCRIPTION_STR: &str = "Описание";

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Transactions {
        Transactions::parse(vec![
            vec![
                "Дата операции",
                "Номер карты",
                "Сумма операции",
                "Категория",
                "Описание",
                "Бонусы (включая кэшбэк)",
            ],
            vec![
                "31.12.2021 16:44:00",
                "*7197",
                "-160.89",
                "Супермаркеты",
                "Колхоз",
                "3",
            ],
            vec![
                "31.12.2021 16:42:04",
                "*7197",
                "-64.00",
                "Супермаркеты",
                "Колхоз",
                "1",
            ],
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_known_and_unknown_columns() {
        let txns = sample();
        assert_eq!(txns.len(), 2);
        let first = &txns.data()[0];
        assert_eq!(first.operation_date(), "31.12.2021 16:44:00");
        assert_eq!(first.card_number(), "*7197");
        assert_eq!(first.category(), "Супермаркеты");
        assert_eq!(first.get_by_header("Бонусы (включая кэшбэк)"), "3");
    }

    #[test]
    fn test_amount_parses_from_raw_string() {
        let txns = sample();
        let amount = txns.data()[0].amount().unwrap();
        assert_eq!(amount.value(), Decimal::new(-16089, 2));
    }

    #[test]
    fn test_record_preserves_column_order_and_values() {
        let txns = sample();
        let record = txns.data()[0].to_record(txns.mapping());
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(
            keys,
            vec![
                "Дата операции",
                "Номер карты",
                "Сумма операции",
                "Категория",
                "Описание",
                "Бонусы (включая кэшбэк)",
            ]
        );
        assert_eq!(record["Сумма операции"], "-160.89");
    }

    #[test]
    fn test_short_row_defaults_missing_fields() {
        let txns = Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции", "Категория"],
            vec!["01.07.2024", "-100.00"],
        ])
        .unwrap();
        assert_eq!(txns.data()[0].category(), "");
    }

    #[test]
    fn test_row_longer_than_headers_is_rejected() {
        let result = Transactions::parse(vec![
            vec!["Дата операции", "Сумма операции"],
            vec!["01.07.2024", "-100.00", "излишек"],
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let rows: Vec<Vec<&str>> = Vec::new();
        assert!(Transactions::parse(rows).is_err());
    }

    #[test]
    fn test_default_table_is_empty() {
        let txns = Transactions::default();
        assert!(txns.is_empty());
        assert!(txns.mapping().is_empty());
    }
}
