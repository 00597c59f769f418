use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::Table;

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Render the internal log as a table (also used by tests).
    pub fn render(entries: &[LogEntry]) -> String {
        let mut table = Table::new(&["id", "date", "operation", "message"]).with_max_width(60);
        for e in entries {
            table.add_row(vec![
                e.id.to_string(),
                display_date(&e.date),
                op_target(e),
                e.message.clone(),
            ]);
        }
        table.render()
    }

    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        header("Internal log");
        print!("{}", Self::render(&entries));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::log::ttlog;

    #[test]
    fn renders_operations_with_targets() {
        let pool = DbPool::in_memory().unwrap();
        ttlog(&pool.conn, "backup", "/tmp/b.zip", "Backup created").unwrap();

        let out = LogLogic::render(&load_log(&pool.conn).unwrap());
        assert!(out.contains("migration_applied"));
        assert!(out.contains("backup (/tmp/b.zip)"));
        assert!(out.contains("Backup created"));
    }
}
