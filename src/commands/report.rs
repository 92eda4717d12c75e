use crate::args::ReportArgs;
use crate::commands::Out;
use crate::report::{save_report, spending_by_category};
use crate::{import, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;

/// Build the spending-by-category report and optionally persist it as a JSON file.
pub async fn report(statement: &Path, args: &ReportArgs) -> Result<Out<Value>> {
    let transactions = import::load_statement(statement)?;
    let rows = spending_by_category(&transactions, args.category(), args.date());

    let total: Decimal = rows.iter().map(|row| row.total.value()).sum();
    let message = match args.output() {
        Some(path) => {
            save_report(path, &rows).await?;
            format!(
                "Saved {} categories to {}",
                rows.len(),
                path.display()
            )
        }
        None => format!(
            "{} categories totalling {}",
            rows.len(),
            format_num::format_num!(",.2", total.to_f64().unwrap_or_default())
        ),
    };

    Ok(Out::new(message, serde_json::to_value(&rows)?))
}
