use crate::utils::date::{parse_date, today_str};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,          // ⇔ expenses.id
    pub user_id: i64,     // ⇔ expenses.user_id (FK users.id)
    pub title: String,    // ⇔ expenses.title
    pub amount: f64,      // ⇔ expenses.amount (REAL)
    pub category: String, // ⇔ expenses.category (free text)
    pub date: String,     // ⇔ expenses.date (TEXT "YYYY-MM-DD")
}

/// The user-editable part of an expense, already coerced and ready to store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseInput {
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
}

impl ExpenseInput {
    /// Build an input from raw form values.
    ///
    /// - missing title/category → ""
    /// - malformed or non-finite amount → 0.0
    /// - missing, blank or malformed date → today
    pub fn from_raw(
        title: Option<&str>,
        category: Option<&str>,
        amount: Option<&str>,
        date: Option<&str>,
    ) -> Self {
        let date = date
            .and_then(parse_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(today_str);

        Self {
            title: title.unwrap_or_default().to_string(),
            category: category.unwrap_or_default().to_string(),
            amount: parse_amount(amount.unwrap_or_default()),
            date,
        }
    }
}

impl From<&Expense> for ExpenseInput {
    fn from(e: &Expense) -> Self {
        Self {
            title: e.title.clone(),
            category: e.category.clone(),
            amount: e.amount,
            date: e.date.clone(),
        }
    }
}

/// Lenient amount parser: anything that is not a finite number becomes zero.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
