use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::AuthLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        user,
        format,
        file,
        range,
        force,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;
        let user_id = AuthLogic::user_id(&pool, user)?;
        ExportLogic::export_to_file(
            &mut pool,
            user_id,
            *format,
            file,
            range.as_deref(),
            *force,
            &cfg.currency_symbol,
        )?;
    }
    Ok(())
}
