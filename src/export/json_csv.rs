// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExpenseExport;
use crate::export::model::HEADERS;

/// JSON, pretty-printed.
pub(crate) fn json_bytes(rows: &[ExpenseExport]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))
}

/// CSV with a header row, also when there are no expenses.
pub(crate) fn csv_bytes(rows: &[ExpenseExport]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for item in rows {
        let amount = item.amount.to_string();
        wtr.write_record([
            item.title.as_str(),
            item.category.as_str(),
            amount.as_str(),
            item.date.as_str(),
        ])
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))
}
