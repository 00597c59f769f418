use crate::errors::AppResult;
use crate::models::{Expense, ExpenseInput, Goal, MonthFilter, User, YearMonth};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ---------------------------
// Users
// ---------------------------

fn map_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password: row.get("password")?,
    })
}

pub fn find_user_by_username(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, username, password FROM users WHERE username = ?1")?;
    Ok(stmt.query_row([username], map_user).optional()?)
}

pub fn insert_user(conn: &Connection, username: &str, credential: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![username, credential],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_user_password(conn: &Connection, user_id: i64, credential: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET password = ?2 WHERE id = ?1",
        params![user_id, credential],
    )?;
    Ok(())
}

// ---------------------------
// Expenses
// ---------------------------

pub fn map_expense(row: &Row) -> Result<Expense> {
    Ok(Expense {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        amount: row.get::<_, Option<f64>>("amount")?.unwrap_or(0.0),
        category: row.get::<_, Option<String>>("category")?.unwrap_or_default(),
        date: row.get::<_, Option<String>>("date")?.unwrap_or_default(),
    })
}

const EXPENSE_COLUMNS: &str = "id, user_id, title, amount, category, date";

pub fn insert_expense(conn: &Connection, user_id: i64, e: &ExpenseInput) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO expenses (user_id, title, amount, category, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![user_id, e.title, e.amount, e.category, e.date])?;
    Ok(conn.last_insert_rowid())
}

/// Load one expense, only if it belongs to `user_id`.
pub fn load_expense(conn: &Connection, user_id: i64, id: i64) -> AppResult<Option<Expense>> {
    let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1 AND user_id = ?2");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row(params![id, user_id], map_expense).optional()?)
}

/// Returns the number of rows changed (0 when the expense is not the user's).
pub fn update_expense(
    conn: &Connection,
    user_id: i64,
    id: i64,
    e: &ExpenseInput,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE expenses
         SET title = ?3, amount = ?4, category = ?5, date = ?6
         WHERE id = ?1 AND user_id = ?2",
        params![id, user_id, e.title, e.amount, e.category, e.date],
    )?;
    Ok(n)
}

pub fn delete_expense(conn: &Connection, user_id: i64, id: i64) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;
    Ok(n)
}

/// Delete the intersection of `ids` with the user's rows, in one transaction.
pub fn delete_expenses(conn: &mut Connection, user_id: i64, ids: &[i64]) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let mut deleted = 0;
    {
        let mut stmt = tx.prepare_cached("DELETE FROM expenses WHERE id = ?1 AND user_id = ?2")?;
        for id in ids {
            deleted += stmt.execute(params![id, user_id])?;
        }
    }
    tx.commit()?;
    Ok(deleted)
}

fn collect_expenses(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<Expense>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, map_expense)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The user's expenses for a month (or all of them), newest first.
pub fn load_expenses(
    conn: &Connection,
    user_id: i64,
    filter: &MonthFilter,
) -> AppResult<Vec<Expense>> {
    match filter {
        MonthFilter::Lifetime => collect_expenses(
            conn,
            &format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses
                 WHERE user_id = ?1
                 ORDER BY date DESC, id DESC"
            ),
            params![user_id],
        ),
        MonthFilter::Month(ym) => collect_expenses(
            conn,
            &format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses
                 WHERE user_id = ?1 AND date LIKE ?2
                 ORDER BY date DESC, id DESC"
            ),
            params![user_id, ym.like_pattern()],
        ),
    }
}

/// The user's expenses within inclusive date bounds, oldest first (export order).
pub fn load_expenses_between(
    conn: &Connection,
    user_id: i64,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<Expense>> {
    match bounds {
        None => collect_expenses(
            conn,
            &format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses
                 WHERE user_id = ?1
                 ORDER BY date ASC, id ASC"
            ),
            params![user_id],
        ),
        Some((start, end)) => collect_expenses(
            conn,
            &format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses
                 WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
                 ORDER BY date ASC, id ASC"
            ),
            params![
                user_id,
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
        ),
    }
}

pub fn month_total(conn: &Connection, user_id: i64, month: &YearMonth) -> AppResult<f64> {
    let total: f64 = conn.query_row(
        "SELECT IFNULL(SUM(amount), 0.0) FROM expenses WHERE user_id = ?1 AND date LIKE ?2",
        params![user_id, month.like_pattern()],
        |row| row.get(0),
    )?;
    Ok(total)
}

// ---------------------------
// Goals
// ---------------------------

/// Insert or update the goal for (user, month) as a single statement.
pub fn upsert_goal(conn: &Connection, user_id: i64, month: &YearMonth, amount: f64) -> AppResult<()> {
    conn.execute(
        "INSERT INTO goals (user_id, month, amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, month) DO UPDATE SET amount = excluded.amount",
        params![user_id, month.to_string(), amount],
    )?;
    Ok(())
}

pub fn load_goal(conn: &Connection, user_id: i64, month: &str) -> AppResult<Option<Goal>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, month, amount FROM goals WHERE user_id = ?1 AND month = ?2",
    )?;
    let goal = stmt
        .query_row(params![user_id, month], |row| {
            Ok(Goal {
                id: row.get(0)?,
                user_id: row.get(1)?,
                month: row.get(2)?,
                amount: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })
        .optional()?;
    Ok(goal)
}
