// src/export/logic.rs

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::load_expenses_between;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::{ensure_writable, write_bytes};
use crate::export::json_csv::{csv_bytes, json_bytes};
use crate::export::model::to_export_rows;
use crate::export::pdf_export::{REPORT_TITLE, pdf_bytes};
use crate::export::range::{describe_range, parse_range};
use crate::export::xlsx::xlsx_bytes;
use crate::export::{ExportFormat, notify_export_success};
use crate::models::Expense;
use crate::ui::messages::{info, warning};
use chrono::NaiveDate;
use std::path::Path;

/// High level export entry points.
pub struct ExportLogic;

impl ExportLogic {
    /// Encode expenses in the requested format. No I/O: the web routes send
    /// the bytes as a download, the CLI writes them to a file.
    pub fn render(
        expenses: &[Expense],
        format: ExportFormat,
        currency: &str,
        title: &str,
    ) -> AppResult<Vec<u8>> {
        let rows = to_export_rows(expenses);
        match format {
            ExportFormat::Csv => csv_bytes(&rows),
            ExportFormat::Json => json_bytes(&rows),
            ExportFormat::Xlsx => xlsx_bytes(&rows),
            ExportFormat::Pdf => Ok(pdf_bytes(&rows, currency, title)),
        }
    }

    /// Export one user's expenses to a file.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and their
    ///   `start:end` forms
    ///
    /// Returns the number of exported expenses.
    pub fn export_to_file(
        pool: &mut DbPool,
        user_id: i64,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
        currency: &str,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Validation(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let date_bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.trim().eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        ensure_writable(path, force)?;

        let expenses = load_expenses_between(&pool.conn, user_id, date_bounds)?;
        if expenses.is_empty() {
            warning("No expenses found for the selected range.");
        }

        info(format!(
            "Exporting to {}: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));

        let title = build_report_title(range);
        let bytes = Self::render(&expenses, format, currency, &title)?;
        write_bytes(path, &bytes)?;

        ttlog(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} expenses to {}", expenses.len(), path.display()),
        )?;

        notify_export_success(&format.as_str().to_uppercase(), expenses.len(), path);
        Ok(expenses.len())
    }
}

/// PDF title for the selected period.
fn build_report_title(range: Option<&str>) -> String {
    match range.and_then(describe_range) {
        Some(period) => format!("{REPORT_TITLE} {period}"),
        None => REPORT_TITLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_titles() {
        assert_eq!(build_report_title(None), "Expense Report");
        assert_eq!(build_report_title(Some("all")), "Expense Report");
        assert_eq!(
            build_report_title(Some("2025-10")),
            "Expense Report for October 2025"
        );
        assert_eq!(
            build_report_title(Some("2025-01-01:2025-01-31")),
            "Expense Report from 2025-01-01 to 2025-01-31"
        );
    }

    #[test]
    fn relative_paths_are_rejected() {
        let mut pool = DbPool::in_memory().unwrap();
        let err = ExportLogic::export_to_file(
            &mut pool,
            1,
            ExportFormat::Csv,
            "out.csv",
            None,
            true,
            "$",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
