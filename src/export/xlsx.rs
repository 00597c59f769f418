// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExpenseExport;
use crate::export::model::HEADERS;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

pub const EXPENSES_SHEET: &str = "Expenses";
pub const TEMPLATE_SHEET: &str = "Expense Template";
pub const TEMPLATE_HEADERS: [&str; 4] = ["Title", "Category", "Amount", "Date (YYYY-MM-DD)"];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str]) -> AppResult<Vec<usize>> {
    let fmt = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &fmt)
            .map_err(to_export_error)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    Ok(headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect())
}

fn set_widths(worksheet: &mut Worksheet, col_widths: &[usize]) -> AppResult<()> {
    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_export_error)?;
    }
    Ok(())
}

/// Workbook with one "Expenses" sheet: styled header, banded rows, auto widths.
/// Amounts are numeric cells; dates stay text so a re-import reads them verbatim.
pub(crate) fn xlsx_bytes(rows: &[ExpenseExport]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPENSES_SHEET).map_err(to_export_error)?;

    let mut col_widths = write_header(worksheet, &HEADERS)?;

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, e) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { band1 } else { band2 };

        let text = Format::new()
            .set_background_color(band)
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);
        let number = text.clone().set_num_format("0.00").set_align(FormatAlign::Right);

        worksheet
            .write_with_format(row, 0, e.title.as_str(), &text)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(row, 1, e.category.as_str(), &text)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(row, 2, e.amount, &number)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(row, 3, e.date.as_str(), &text)
            .map_err(to_export_error)?;

        let amount = format!("{:.2}", e.amount);
        for (col, cell) in [e.title.as_str(), e.category.as_str(), amount.as_str(), e.date.as_str()]
            .iter()
            .enumerate()
        {
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(*cell));
        }
    }

    set_widths(worksheet, &col_widths)?;

    workbook.save_to_buffer().map_err(to_export_error)
}

/// The import template: header plus one sample row, all as text.
pub fn template_xlsx_bytes() -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET).map_err(to_export_error)?;

    let mut col_widths = write_header(worksheet, &TEMPLATE_HEADERS)?;

    let sample = ["Lunch", "Food", "150.00", "2025-10-27"];
    for (col, value) in sample.iter().enumerate() {
        worksheet
            .write(1, col as u16, *value)
            .map_err(to_export_error)?;
        col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(*value));
    }

    set_widths(worksheet, &col_widths)?;

    workbook.save_to_buffer().map_err(to_export_error)
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
