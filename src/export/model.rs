// src/export/model.rs

use crate::models::Expense;
use crate::utils::formatting::amount_cell;
use serde::Serialize;

/// Column titles shared by CSV, XLSX and PDF, in export order.
pub const HEADERS: [&str; 4] = ["Title", "Category", "Amount", "Date"];

/// Flat row written by every exporter. Serialized names match `HEADERS`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ExpenseExport {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Date")]
    pub date: String,
}

impl From<&Expense> for ExpenseExport {
    fn from(e: &Expense) -> Self {
        Self {
            title: e.title.clone(),
            category: e.category.clone(),
            amount: e.amount,
            date: e.date.clone(),
        }
    }
}

pub(crate) fn to_export_rows(expenses: &[Expense]) -> Vec<ExpenseExport> {
    expenses.iter().map(ExpenseExport::from).collect()
}

/// Text cells for the PDF table. `currency` is already safe for the PDF font.
pub(crate) fn expense_to_row(e: &ExpenseExport, currency: &str) -> Vec<String> {
    vec![
        e.title.clone(),
        e.category.clone(),
        format!("{currency}{}", amount_cell(e.amount)),
        e.date.clone(),
    ]
}
