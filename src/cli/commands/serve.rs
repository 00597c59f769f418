use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::web;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { bind, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(addr) = bind {
            cfg.bind_address = addr.clone();
        }
        if let Some(port) = port {
            cfg.port = *port;
        }

        info(format!(
            "Serving on http://{}:{} (Ctrl+C to stop)",
            cfg.bind_address, cfg.port
        ));
        web::run(&cfg)?;
    }
    Ok(())
}
