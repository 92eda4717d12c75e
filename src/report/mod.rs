//! The report/aggregation pipeline: windowed filtering, grouping, sorting and JSON shaping over
//! a normalized statement table.

mod cards;
mod category;
mod search;
mod top;

use crate::{utils, Result};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::path::Path;

pub use cards::{card_summary, AnalysisError, CardSummary};
pub use category::{spending_by_category, CategorySpend};
pub use search::{search_transactions, SearchError};
pub use top::{top_transactions, ReferenceDateError, TopTransaction, TopTransactions};

/// An inclusive [start, end] timestamp range.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ReportWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ReportWindow {
    /// A trailing window ending at `end` and extending `days` backward.
    pub fn trailing_days(end: NaiveDateTime, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// From the first instant of the reference date's calendar month through the reference
    /// timestamp itself.
    pub fn month_to_date(reference: NaiveDateTime) -> Self {
        let first = reference.date().with_day0(0).unwrap_or(reference.date());
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: reference,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Both endpoints are inclusive.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Writes a report as pretty-printed JSON to `path`.
///
/// The report functions themselves are pure; persisting their output is a separate, optional
/// step that callers opt into.
pub async fn save_report<T>(path: impl AsRef<Path>, report: &T) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(report)?;
    utils::write(path, json).await
}
