//! Form and query payloads. Every field is optional: missing values are
//! coerced downstream rather than rejected by the extractor.

use crate::models::ExpenseInput;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AuthForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AuthForm {
    pub fn credentials(&self) -> (&str, &str) {
        (
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl ExpenseForm {
    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput::from_raw(
            self.title.as_deref(),
            self.category.as_deref(),
            self.amount.as_deref(),
            self.date.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalForm {
    pub month: Option<String>,
    pub goal_amount: Option<String>,
}

/// `?month=YYYY-MM|lifetime` on GET, or the same field posted by the month picker.
#[derive(Debug, Default, Deserialize)]
pub struct MonthForm {
    pub month: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_form_coerces_missing_values() {
        let form = ExpenseForm {
            title: Some("Lunch".into()),
            category: None,
            amount: Some("abc".into()),
            date: Some("2025-10-27".into()),
        };
        let input = form.to_input();
        assert_eq!(input.title, "Lunch");
        assert_eq!(input.category, "");
        assert_eq!(input.amount, 0.0);
        assert_eq!(input.date, "2025-10-27");
    }
}
