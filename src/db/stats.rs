use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::OptionalExtension;
use std::fs;

/// Figures shown by `rexpenses db --info`.
#[derive(Debug, Clone, PartialEq)]
pub struct DbInfo {
    pub file_size_bytes: u64,
    pub users: i64,
    pub expenses: i64,
    pub goals: i64,
    pub total_amount: f64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn collect_db_info(pool: &DbPool, db_path: &str) -> AppResult<DbInfo> {
    let file_size_bytes = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    let count = |table: &str| -> AppResult<i64> {
        let n = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n)
    };

    let total_amount: f64 = pool.conn.query_row(
        "SELECT IFNULL(SUM(amount), 0.0) FROM expenses",
        [],
        |row| row.get(0),
    )?;

    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(date) FROM expenses", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(date) FROM expenses", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();

    Ok(DbInfo {
        file_size_bytes,
        users: count("users")?,
        expenses: count("expenses")?,
        goals: count("goals")?,
        total_amount,
        first_date,
        last_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::{insert_expense, insert_user};
    use crate::models::ExpenseInput;

    #[test]
    fn counts_rows_and_date_range() {
        let pool = DbPool::in_memory().unwrap();
        let info = collect_db_info(&pool, ":memory:").unwrap();
        assert_eq!(info.expenses, 0);
        assert_eq!(info.first_date, None);

        let u = insert_user(&pool.conn, "ana", "pw").unwrap();
        for (d, a) in [("2025-01-05", 10.0), ("2025-03-09", 2.5)] {
            let e = ExpenseInput {
                title: "t".into(),
                category: "c".into(),
                amount: a,
                date: d.into(),
            };
            insert_expense(&pool.conn, u, &e).unwrap();
        }

        let info = collect_db_info(&pool, ":memory:").unwrap();
        assert_eq!(info.users, 1);
        assert_eq!(info.expenses, 2);
        assert_eq!(info.total_amount, 12.5);
        assert_eq!(info.first_date.as_deref(), Some("2025-01-05"));
        assert_eq!(info.last_date.as_deref(), Some("2025-03-09"));
    }
}
