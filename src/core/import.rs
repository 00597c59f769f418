//! Spreadsheet import: workbook (xlsx/xls/ods) or CSV, header-driven, all rows
//! inserted in a single transaction.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::insert_expense;
use crate::errors::{AppError, AppResult};
use crate::export::excel_date::excel_serial_to_date;
use crate::models::ExpenseInput;
use crate::models::expense::parse_amount;
use crate::utils::date::{parse_date, today_str};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub const INVALID_FORMAT: &str = "Invalid Excel format. Please use the provided template.";

/// A cell as read from any of the supported file types.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    fn from_data(d: &Data) -> Self {
        match d {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
                .map(Cell::Date)
                .unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }

    fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn amount(&self) -> f64 {
        match self {
            Cell::Number(n) if n.is_finite() => *n,
            Cell::Text(s) => parse_amount(s),
            _ => 0.0,
        }
    }

    /// A real date, if the cell holds one.
    fn date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_text_date(s),
            _ => None,
        }
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part (`2025-10-27 00:00:00`).
fn parse_text_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.split(['T', ' ']).next().unwrap_or(s);
    parse_date(day)
}

/// Column positions found in the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    title: Option<usize>,
    category: Option<usize>,
    amount: Option<usize>,
    date: usize,
}

fn detect_columns(header: &[Cell]) -> AppResult<Columns> {
    let names: Vec<String> = header.iter().map(|c| c.text().to_lowercase()).collect();
    let find = |wanted: &str| names.iter().position(|n| n == wanted);

    let date = find("date")
        .or_else(|| find("date (yyyy-mm-dd)"))
        .ok_or_else(|| AppError::InvalidImport(INVALID_FORMAT.into()))?;

    Ok(Columns {
        title: find("title"),
        category: find("category"),
        amount: find("amount"),
        date,
    })
}

fn cell_at(row: &[Cell], idx: Option<usize>) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    idx.and_then(|i| row.get(i)).unwrap_or(EMPTY)
}

/// Turn one data row into an expense, or `None` for a fully empty row.
fn row_to_input(row: &[Cell], cols: &Columns) -> Option<ExpenseInput> {
    if row.iter().all(Cell::is_blank) {
        return None;
    }

    let mut title_cell = cell_at(row, cols.title);
    let mut date_cell = cell_at(row, Some(cols.date));

    // Title and date columns swapped in the sheet.
    if cols.title.is_some() && title_cell.date().is_some() && date_cell.date().is_none() {
        std::mem::swap(&mut title_cell, &mut date_cell);
    }

    let date = date_cell
        .date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(today_str);

    Some(ExpenseInput {
        title: title_cell.text(),
        category: cell_at(row, cols.category).text(),
        amount: cell_at(row, cols.amount).amount(),
        date,
    })
}

fn rows_to_inputs(rows: Vec<Vec<Cell>>) -> AppResult<Vec<ExpenseInput>> {
    let mut iter = rows.into_iter();
    let header = iter
        .next()
        .ok_or_else(|| AppError::InvalidImport(INVALID_FORMAT.into()))?;
    let cols = detect_columns(&header)?;

    Ok(iter.filter_map(|row| row_to_input(&row, &cols)).collect())
}

fn read_workbook(bytes: &[u8]) -> AppResult<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::InvalidImport(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::InvalidImport("workbook has no sheets".into()))?
        .map_err(|e| AppError::InvalidImport(e.to_string()))?;

    Ok(range
        .rows()
        .map(|r| r.iter().map(Cell::from_data).collect())
        .collect())
}

fn read_csv(bytes: &[u8]) -> AppResult<Vec<Vec<Cell>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| AppError::InvalidImport(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|s| {
                    let s = s.trim_start_matches('\u{feff}');
                    if s.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(s.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

fn is_csv(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

pub struct ImportLogic;

impl ImportLogic {
    /// Parse an uploaded file into expense rows without touching the database.
    pub fn parse(filename: &str, bytes: &[u8]) -> AppResult<Vec<ExpenseInput>> {
        let rows = if is_csv(filename) {
            read_csv(bytes)?
        } else {
            read_workbook(bytes)?
        };
        rows_to_inputs(rows)
    }

    /// Parse and insert every row for `user_id`. Nothing is stored on failure.
    pub fn import(
        pool: &mut DbPool,
        user_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<usize> {
        let inputs = Self::parse(filename, bytes)?;

        let tx = pool.conn.transaction()?;
        for input in &inputs {
            insert_expense(&tx, user_id, input)?;
        }
        ttlog(
            &tx,
            "import",
            filename,
            &format!("{} expenses for user {user_id}", inputs.len()),
        )?;
        tx.commit()?;

        Ok(inputs.len())
    }

    pub fn import_file(pool: &mut DbPool, user_id: i64, path: &Path) -> AppResult<usize> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::import(pool, user_id, &name, &bytes)
    }
}
