use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_expense, delete_expenses, insert_expense, load_expense, load_expenses, update_expense,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Expense, ExpenseInput, MonthFilter};

/// Expense CRUD. Every call is scoped by the owning user: another user's row
/// behaves exactly like a missing one.
pub struct ExpenseLogic;

impl ExpenseLogic {
    pub fn add(pool: &mut DbPool, user_id: i64, input: &ExpenseInput) -> AppResult<i64> {
        insert_expense(&pool.conn, user_id, input)
    }

    pub fn get(pool: &DbPool, user_id: i64, id: i64) -> AppResult<Expense> {
        load_expense(&pool.conn, user_id, id)?.ok_or(AppError::ExpenseNotFound)
    }

    pub fn update(
        pool: &mut DbPool,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> AppResult<()> {
        match update_expense(&pool.conn, user_id, id, input)? {
            0 => Err(AppError::ExpenseNotFound),
            _ => Ok(()),
        }
    }

    /// Deleting a missing expense is not an error. Returns whether a row went away.
    pub fn delete(pool: &mut DbPool, user_id: i64, id: i64) -> AppResult<bool> {
        Ok(delete_expense(&pool.conn, user_id, id)? > 0)
    }

    /// Delete the user's rows among `ids`. Returns how many were deleted.
    pub fn delete_many(pool: &mut DbPool, user_id: i64, ids: &[i64]) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        pool.with_conn(|conn| delete_expenses(conn, user_id, ids))
    }

    pub fn list(pool: &DbPool, user_id: i64, filter: &MonthFilter) -> AppResult<Vec<Expense>> {
        load_expenses(&pool.conn, user_id, filter)
    }
}

/// Keep the ids that parse as integers, dropping duplicates.
pub fn parse_ids<'a, I>(raw: I) -> Vec<i64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<i64> = Vec::new();
    for r in raw {
        if let Ok(id) = r.trim().parse::<i64>()
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::AuthLogic;

    fn lunch() -> ExpenseInput {
        ExpenseInput::from_raw(Some("Lunch"), Some("Food"), Some("12.5"), Some("2025-10-01"))
    }

    #[test]
    fn other_users_see_not_found() {
        let mut pool = DbPool::in_memory().unwrap();
        let a = AuthLogic::register(&mut pool, "a", "pw").unwrap();
        let b = AuthLogic::register(&mut pool, "b", "pw").unwrap();

        let id = ExpenseLogic::add(&mut pool, a, &lunch()).unwrap();

        assert!(matches!(
            ExpenseLogic::get(&pool, b, id),
            Err(AppError::ExpenseNotFound)
        ));
        assert!(matches!(
            ExpenseLogic::update(&mut pool, b, id, &lunch()),
            Err(AppError::ExpenseNotFound)
        ));
        assert!(!ExpenseLogic::delete(&mut pool, b, id).unwrap());
        assert_eq!(ExpenseLogic::get(&pool, a, id).unwrap().amount, 12.5);
    }

    #[test]
    fn update_changes_fields() {
        let mut pool = DbPool::in_memory().unwrap();
        let a = AuthLogic::register(&mut pool, "a", "pw").unwrap();
        let id = ExpenseLogic::add(&mut pool, a, &lunch()).unwrap();

        let edit =
            ExpenseInput::from_raw(Some("Dinner"), Some("Food"), Some("bad"), Some("2025-10-02"));
        ExpenseLogic::update(&mut pool, a, id, &edit).unwrap();

        let e = ExpenseLogic::get(&pool, a, id).unwrap();
        assert_eq!(e.title, "Dinner");
        assert_eq!(e.amount, 0.0);
        assert_eq!(e.date, "2025-10-02");
    }

    #[test]
    fn delete_missing_is_silent() {
        let mut pool = DbPool::in_memory().unwrap();
        let a = AuthLogic::register(&mut pool, "a", "pw").unwrap();
        assert!(!ExpenseLogic::delete(&mut pool, a, 404).unwrap());
        assert_eq!(ExpenseLogic::delete_many(&mut pool, a, &[]).unwrap(), 0);
    }

    #[test]
    fn ids_are_filtered() {
        assert_eq!(parse_ids(["1", " 2 ", "x", "", "2", "-3"]), vec![1, 2, -3]);
    }
}
