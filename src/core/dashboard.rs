//! Dashboard aggregation: totals per month, per category, month-over-month
//! change and the textual insights shown above the expense table.

use crate::core::goals::GoalLogic;
use crate::db::pool::DbPool;
use crate::db::queries::{load_expenses, month_total};
use crate::errors::AppResult;
use crate::models::{Expense, MonthFilter, YearMonth};
use crate::utils::formatting::{money, round2};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub filter: MonthFilter,
    pub expenses: Vec<Expense>,
    pub total_spent: f64,
    /// Sum per category, ordered by category name.
    pub category_totals: BTreeMap<String, f64>,
    pub goal_amount: Option<f64>,
    pub previous_total: Option<f64>,
    pub change_pct: Option<f64>,
    pub insights: Vec<String>,
}

pub struct DashboardLogic;

impl DashboardLogic {
    /// Load what the dashboard needs for `filter` and aggregate it.
    pub fn build(
        pool: &DbPool,
        user_id: i64,
        filter: MonthFilter,
        currency: &str,
    ) -> AppResult<DashboardSummary> {
        let expenses = load_expenses(&pool.conn, user_id, &filter)?;

        let (goal, previous_total) = match filter.month() {
            Some(ym) => (
                GoalLogic::get(pool, user_id, &ym)?,
                Some(month_total(&pool.conn, user_id, &ym.previous())?),
            ),
            None => (None, None),
        };

        Ok(Self::summarize(
            filter,
            expenses,
            goal,
            previous_total,
            currency,
        ))
    }

    /// Pure aggregation over already loaded rows.
    pub fn summarize(
        filter: MonthFilter,
        expenses: Vec<Expense>,
        goal_amount: Option<f64>,
        previous_total: Option<f64>,
        currency: &str,
    ) -> DashboardSummary {
        let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_spent = 0.0;
        for e in &expenses {
            *category_totals.entry(e.category.clone()).or_insert(0.0) += e.amount;
            total_spent += e.amount;
        }

        let change_pct = match (filter, previous_total) {
            (MonthFilter::Month(_), Some(prev)) if prev > 0.0 => {
                Some((total_spent - prev) / prev * 100.0)
            }
            _ => None,
        };

        let mut insights = Vec::new();

        if let Some(goal) = goal_amount.filter(|g| *g > 0.0) {
            insights.push(goal_insight(total_spent, goal, currency));
        }

        if let (Some(pct), Some(ym)) = (change_pct, filter.month()) {
            insights.push(trend_insight(pct, &ym.previous()));
        }

        DashboardSummary {
            filter,
            expenses,
            total_spent,
            category_totals,
            goal_amount,
            previous_total,
            change_pct,
            insights,
        }
    }
}

fn goal_insight(total: f64, goal: f64, currency: &str) -> String {
    if total <= goal {
        format!(
            "✅ Within goal. You can still spend {} this month.",
            money(currency, goal - total)
        )
    } else {
        format!("⚠️ Goal exceeded by {}.", money(currency, total - goal))
    }
}

fn trend_insight(pct: f64, previous: &YearMonth) -> String {
    let shown = (pct * 10.0).round() / 10.0;
    let label = previous.label();
    if shown > 0.0 {
        format!("📈 Spending up {shown:.1}% compared to {label}.")
    } else if shown < 0.0 {
        format!("📉 Spending down {:.1}% compared to {label}.", -shown)
    } else {
        format!("➖ Spending unchanged compared to {label}.")
    }
}

impl DashboardSummary {
    /// Rounded percentage for display, e.g. "+12.5%".
    pub fn change_label(&self) -> Option<String> {
        self.change_pct.map(|p| format!("{:+.1}%", round2(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oct() -> MonthFilter {
        MonthFilter::Month(YearMonth::new(2025, 10).unwrap())
    }

    fn exp(id: i64, amount: f64, category: &str) -> Expense {
        Expense {
            id,
            user_id: 1,
            title: format!("e{id}"),
            amount,
            category: category.into(),
            date: "2025-10-05".into(),
        }
    }

    #[test]
    fn within_goal_reports_remaining() {
        let s = DashboardLogic::summarize(
            oct(),
            vec![exp(1, 100.0, "Food"), exp(2, 50.0, "Food")],
            Some(200.0),
            None,
            "₹",
        );
        assert_eq!(s.total_spent, 150.0);
        assert_eq!(s.category_totals.len(), 1);
        assert_eq!(s.category_totals["Food"], 150.0);
        assert_eq!(
            s.insights,
            vec!["✅ Within goal. You can still spend ₹50.00 this month.".to_string()]
        );
    }

    #[test]
    fn over_goal_reports_excess() {
        let s = DashboardLogic::summarize(oct(), vec![exp(1, 250.5, "Rent")], Some(200.0), None, "$");
        assert_eq!(s.insights, vec!["⚠️ Goal exceeded by $50.50.".to_string()]);
    }

    #[test]
    fn zero_goal_gives_no_goal_insight() {
        let s = DashboardLogic::summarize(oct(), vec![exp(1, 5.0, "x")], Some(0.0), None, "$");
        assert!(s.insights.is_empty());
    }

    #[test]
    fn category_totals_partition_total() {
        let s = DashboardLogic::summarize(
            oct(),
            vec![
                exp(1, 10.0, "Food"),
                exp(2, 2.5, "Travel"),
                exp(3, 7.5, "Food"),
                exp(4, 1.0, ""),
            ],
            None,
            None,
            "$",
        );
        let sum: f64 = s.category_totals.values().sum();
        assert_eq!(sum, s.total_spent);
        assert_eq!(
            s.category_totals.keys().collect::<Vec<_>>(),
            vec!["", "Food", "Travel"]
        );
    }

    #[test]
    fn month_over_month_change() {
        let s = DashboardLogic::summarize(oct(), vec![exp(1, 150.0, "x")], None, Some(100.0), "$");
        assert_eq!(s.change_pct, Some(50.0));
        assert_eq!(
            s.insights,
            vec!["📈 Spending up 50.0% compared to September 2025.".to_string()]
        );

        let s = DashboardLogic::summarize(oct(), vec![exp(1, 75.0, "x")], None, Some(100.0), "$");
        assert_eq!(
            s.insights,
            vec!["📉 Spending down 25.0% compared to September 2025.".to_string()]
        );

        let s = DashboardLogic::summarize(oct(), vec![], None, Some(0.0), "$");
        assert_eq!(s.change_pct, None);
    }

    #[test]
    fn lifetime_has_no_comparison() {
        let s = DashboardLogic::summarize(
            MonthFilter::Lifetime,
            vec![exp(1, 10.0, "x")],
            None,
            Some(5.0),
            "$",
        );
        assert_eq!(s.change_pct, None);
        assert!(s.insights.is_empty());
    }

    #[test]
    fn build_reads_goal_and_previous_month() {
        use crate::core::auth::AuthLogic;
        use crate::core::expenses::ExpenseLogic;
        use crate::core::goals::GoalLogic;
        use crate::models::ExpenseInput;

        let mut pool = DbPool::in_memory().unwrap();
        let u = AuthLogic::register(&mut pool, "u", "pw").unwrap();
        for (amount, date) in [("100", "2025-10-01"), ("50", "2025-10-20"), ("60", "2025-09-15")] {
            let input = ExpenseInput::from_raw(Some("t"), Some("Food"), Some(amount), Some(date));
            ExpenseLogic::add(&mut pool, u, &input).unwrap();
        }
        GoalLogic::set(&mut pool, u, Some("2025-10"), 200.0).unwrap();

        let s = DashboardLogic::build(&pool, u, oct(), "₹").unwrap();
        assert_eq!(s.total_spent, 150.0);
        assert_eq!(s.goal_amount, Some(200.0));
        assert_eq!(s.previous_total, Some(60.0));
        assert_eq!(s.change_pct, Some(150.0));
        assert_eq!(s.change_label().as_deref(), Some("+150.0%"));
        assert_eq!(s.insights.len(), 2);
    }
}
