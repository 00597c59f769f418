// src/export/pdf_export.rs

use crate::export::ExpenseExport;
use crate::export::model::{HEADERS, expense_to_row};
use crate::export::pdf::PdfManager;

pub const REPORT_TITLE: &str = "Expense Report";

/// Render the expense table as a PDF document.
///
/// The currency symbol is only printed when the base font can show it.
pub(crate) fn pdf_bytes(rows: &[ExpenseExport], currency: &str, title: &str) -> Vec<u8> {
    let prefix = if currency.is_ascii() { currency } else { "" };
    let table: Vec<Vec<String>> = rows.iter().map(|e| expense_to_row(e, prefix)).collect();

    let mut pdf = PdfManager::new();
    pdf.write_report(&HEADERS, &table);
    pdf.finish(title)
}
