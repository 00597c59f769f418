use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

const GOALS_UNIQUE_MONTH: &str = "20251101_0001_goals_unique_month";
const EXPENSES_USER_DATE_INDEX: &str = "20251101_0002_expenses_user_date_index";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn migration_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the three application tables if they are missing.
/// Databases from the first revision already have `users` and `expenses`.
fn create_base_tables(conn: &Connection) -> AppResult<()> {
    if !table_exists(conn, "users")? {
        conn.execute_batch(
            r#"
            CREATE TABLE users (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                username  TEXT NOT NULL UNIQUE,
                password  TEXT NOT NULL
            );
            "#,
        )?;
        tracing::info!(table = "users", "created table");
    }

    if !table_exists(conn, "expenses")? {
        conn.execute_batch(
            r#"
            CREATE TABLE expenses (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   INTEGER NOT NULL REFERENCES users(id),
                title     TEXT NOT NULL DEFAULT '',
                amount    REAL NOT NULL DEFAULT 0,
                category  TEXT NOT NULL DEFAULT '',
                date      TEXT NOT NULL
            );
            "#,
        )?;
        tracing::info!(table = "expenses", "created table");
    }

    if !table_exists(conn, "goals")? {
        conn.execute_batch(
            r#"
            CREATE TABLE goals (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   INTEGER NOT NULL REFERENCES users(id),
                month     TEXT NOT NULL,
                amount    REAL NOT NULL DEFAULT 0
            );
            "#,
        )?;
        tracing::info!(table = "goals", "created table");
    }

    Ok(())
}

/// Older databases could hold several goal rows for the same (user, month).
/// Keep the most recent one, then enforce uniqueness with an index.
fn migrate_goals_unique_month(conn: &Connection) -> AppResult<()> {
    if migration_applied(conn, GOALS_UNIQUE_MONTH)? {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;

    let removed = tx.execute(
        "DELETE FROM goals
         WHERE id NOT IN (SELECT MAX(id) FROM goals GROUP BY user_id, month)",
        [],
    )?;
    if removed > 0 {
        tracing::warn!(removed, "collapsed duplicate goal rows");
    }

    tx.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_goals_user_month ON goals(user_id, month);",
    )
    .map_err(|e| AppError::Migration(format!("unique goal index: {e}")))?;

    mark_applied(&tx, GOALS_UNIQUE_MONTH, "Enforced one goal per user and month")?;
    tx.commit()?;

    tracing::info!(version = GOALS_UNIQUE_MONTH, "migration applied");
    Ok(())
}

fn migrate_expenses_index(conn: &Connection) -> AppResult<()> {
    if migration_applied(conn, EXPENSES_USER_DATE_INDEX)? {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);",
    )?;
    mark_applied(conn, EXPENSES_USER_DATE_INDEX, "Indexed expenses by user and date")?;
    tracing::info!(version = EXPENSES_USER_DATE_INDEX, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    create_base_tables(conn)?;
    migrate_goals_unique_month(conn)?;
    migrate_expenses_index(conn)?;
    Ok(())
}
