//! Parsing and normalization of statement date strings.
//!
//! Exports carry dates either as `DD.MM.YYYY[ HH:MM:SS]` or `YYYY-MM-DD[ HH:MM:SS]`, with the
//! time portion optional. Parsing tries the primary format family first and then exactly one
//! fallback family; a string matching neither is a per-row failure, never a pipeline failure.

use crate::model::{Transaction, Transactions};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

/// The strict reference-timestamp format used by the dashboard views.
pub const REFERENCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A date format family. Each family accepts the value with or without a time portion.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DateFormat {
    /// `DD.MM.YYYY[ HH:MM:SS]`, the stored format of statement exports.
    DayMonthYear,
    /// `YYYY-MM-DD[ HH:MM:SS]`, the format of user-supplied reference dates.
    YearMonthDay,
}

impl DateFormat {
    fn with_time(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d.%m.%Y %H:%M:%S",
            DateFormat::YearMonthDay => "%Y-%m-%d %H:%M:%S",
        }
    }

    fn date_only(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d.%m.%Y",
            DateFormat::YearMonthDay => "%Y-%m-%d",
        }
    }

    fn other(&self) -> DateFormat {
        match self {
            DateFormat::DayMonthYear => DateFormat::YearMonthDay,
            DateFormat::YearMonthDay => DateFormat::DayMonthYear,
        }
    }
}

/// Parse a date string against one format family. A missing time portion is taken as midnight.
fn parse_family(s: &str, format: DateFormat) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, format.with_time()) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, format.date_only()) {
        return Some(d.and_time(NaiveTime::MIN));
    }
    None
}

/// Parse a date string: primary format family first, then the other family as the single
/// fallback. Returns `None` when neither matches.
pub fn parse_date_time(s: &str, primary: DateFormat) -> Option<NaiveDateTime> {
    let s = s.trim();
    parse_family(s, primary).or_else(|| parse_family(s, primary.other()))
}

/// A transaction row paired with its normalized timestamp.
#[derive(Debug, Clone, Copy)]
pub struct Dated<'a> {
    pub at: NaiveDateTime,
    pub txn: &'a Transaction,
}

/// Normalize the operation-date column of a table for the date-dependent views.
///
/// Rows whose date string matches neither format family are excluded and logged; they remain in
/// the input table and still appear in views that do not depend on dates. The input is not
/// mutated.
pub fn normalize(transactions: &Transactions, primary: DateFormat) -> Vec<Dated<'_>> {
    let mut dated = Vec::with_capacity(transactions.len());
    for (row_ix, txn) in transactions.data().iter().enumerate() {
        match parse_date_time(txn.operation_date(), primary) {
            Some(at) => dated.push(Dated { at, txn }),
            None => warn!(
                "Row {} has unparseable operation date '{}', excluded from date-dependent views",
                row_ix + 1,
                txn.operation_date()
            ),
        }
    }
    dated
}

/// Parse a strict reference timestamp (`YYYY-MM-DD HH:MM:SS`), as required by the dashboard and
/// top-transaction views.
pub fn parse_reference(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), REFERENCE_FORMAT)
}
