use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{AuthLogic, ImportLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { user, file } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let user_id = AuthLogic::user_id(&pool, user)?;
        let count = ImportLogic::import_file(&mut pool, user_id, Path::new(file))?;
        success(format!("Imported {count} expenses for {user}."));
    }
    Ok(())
}
