use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats::{DbInfo, collect_db_info};
use crate::errors::AppResult;
use crate::ui::messages::{error, header, info, success};
use crate::utils::formatting::amount_cell;
use crate::utils::table::Table;

fn print_db_info(db_path: &str, stats: &DbInfo) {
    header("Database information");
    let mut table = Table::new(&["field", "value"]);
    let rows = [
        ("path", db_path.to_string()),
        ("size (bytes)", stats.file_size_bytes.to_string()),
        ("users", stats.users.to_string()),
        ("expenses", stats.expenses.to_string()),
        ("goals", stats.goals.to_string()),
        ("total amount", amount_cell(stats.total_amount)),
        ("first expense", stats.first_date.clone().unwrap_or_else(|| "-".into())),
        ("last expense", stats.last_date.clone().unwrap_or_else(|| "-".into())),
    ];
    for (k, v) in rows {
        table.add_row(vec![k.to_string(), v]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            info("Running migrations…");
            run_pending_migrations(&pool.conn)?;
            success("Migration completed.");
        }

        if *show_info {
            let stats = collect_db_info(&pool, &cfg.database)?;
            print_db_info(&cfg.database, &stats);
        }

        if *check {
            info("Running integrity check…");
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                error(format!("Integrity check failed: {integrity}"));
            }
        }

        if *vacuum {
            info("Running VACUUM…");
            pool.conn.execute_batch("VACUUM;")?;
            success("Vacuum completed.");
        }
    }

    Ok(())
}
