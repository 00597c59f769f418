use crate::db::pool::DbPool;
use crate::db::queries::{load_goal, upsert_goal};
use crate::errors::AppResult;
use crate::models::{YearMonth, goal_month};

pub struct GoalLogic;

impl GoalLogic {
    /// Set the goal for a month, creating or replacing it.
    ///
    /// `month` falls back to the current month when empty; `lifetime` and
    /// malformed months are refused with `InvalidMonth`.
    pub fn set(
        pool: &mut DbPool,
        user_id: i64,
        month: Option<&str>,
        amount: f64,
    ) -> AppResult<YearMonth> {
        let ym = goal_month(month)?;

        let tx = pool.conn.transaction()?;
        upsert_goal(&tx, user_id, &ym, amount)?;
        tx.commit()?;

        Ok(ym)
    }

    pub fn get(pool: &DbPool, user_id: i64, month: &YearMonth) -> AppResult<Option<f64>> {
        Ok(load_goal(&pool.conn, user_id, &month.to_string())?.map(|g| g.amount))
    }
}
