//! Per-card spend and cashback summary.

use crate::model::{Amount, Transactions, AMOUNT_STR, CARD_NUMBER_STR};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::warn;

/// Summary of the primary card: the card number that occurs most often in the statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: Amount,
    pub cashback: Amount,
}

/// Validation failures of the card analysis, reported to the caller as structured errors with
/// distinct messages per cause.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AnalysisError {
    NoData,
    MissingColumns,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::NoData => write!(f, "Нет данных для анализа"),
            AnalysisError::MissingColumns => {
                write!(f, "Необходимые колонки отсутствуют в данных")
            }
        }
    }
}

impl Error for AnalysisError {}

/// Computes the primary-card summary.
///
/// The primary card is the mode of the card-number column; when counts tie, the card that first
/// reached the maximum count in statement order wins. `total_spent` sums the absolute values of
/// negative amounts only (refunds and income are excluded); `cashback` is 1% of that. Both are
/// rounded to two decimal places.
pub fn card_summary(transactions: &Transactions) -> Result<CardSummary, AnalysisError> {
    if transactions.is_empty() {
        return Err(AnalysisError::NoData);
    }
    if !transactions.mapping().has(CARD_NUMBER_STR) || !transactions.mapping().has(AMOUNT_STR) {
        return Err(AnalysisError::MissingColumns);
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut primary: Option<&str> = None;
    let mut best = 0usize;
    let mut total = Decimal::ZERO;

    for txn in transactions.data() {
        let card = txn.card_number();
        if !card.is_empty() {
            let count = counts.entry(card).or_insert(0);
            *count += 1;
            if *count > best {
                best = *count;
                primary = Some(card);
            }
        }

        match txn.amount() {
            Ok(amount) if amount.is_negative() => total += amount.abs().value(),
            Ok(_) => {}
            Err(e) => warn!("Skipping row with unparseable amount '{}': {e}", txn.amount),
        }
    }

    let Some(card) = primary else {
        // The card-number column exists but holds no values
        return Err(AnalysisError::NoData);
    };

    let skip = card.chars().count().saturating_sub(4);
    let last_digits: String = card.chars().skip(skip).collect();

    let total_spent = Amount::new(total);
    let cashback = Amount::new(total / Decimal::from(100));

    Ok(CardSummary {
        last_digits,
        total_spent,
        cashback,
    })
}
