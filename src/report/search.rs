//! Free-text transaction search over description and category.

use crate::model::{Record, Transactions, CATEGORY_STR, DESCRIPTION_STR};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::info;

/// The statement schema is missing a column the search requires.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SearchError;

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Отсутствуют необходимые колонки в данных")
    }
}

impl Error for SearchError {}

/// Case-insensitive substring search against the description and category columns.
///
/// Both columns must exist in the schema; this is checked up front, before any row is touched.
/// Rows with an empty description or category simply do not match on that field. Matching rows
/// are returned in their original order with every field verbatim. Search does not depend on
/// dates, so rows with unparseable dates still match. An empty match set is a success.
pub fn search_transactions(
    transactions: &Transactions,
    query: &str,
) -> Result<Vec<Record>, SearchError> {
    let mapping = transactions.mapping();
    if !mapping.has(DESCRIPTION_STR) || !mapping.has(CATEGORY_STR) {
        return Err(SearchError);
    }

    let query = query.to_lowercase();
    let matches: Vec<Record> = transactions
        .data()
        .iter()
        .filter(|txn| {
            txn.description().to_lowercase().contains(&query)
                || txn.category().to_lowercase().contains(&query)
        })
        .map(|txn| txn.to_record(mapping))
        .collect();

    info!("Search for '{query}' matched {} transactions", matches.len());
    Ok(matches)
}
