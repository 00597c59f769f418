use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment override for the configuration directory.
pub const HOME_ENV: &str = "REXPENSES_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// File with at least 32 bytes of key material. Empty means an ephemeral key.
    #[serde(default)]
    pub session_key_file: String,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_currency_symbol() -> String {
    "₹".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            bind_address: default_bind_address(),
            port: default_port(),
            session_key_file: String::new(),
            cookie_secure: false,
            currency_symbol: default_currency_symbol(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Return the configuration directory: `$REXPENSES_HOME`, else `~/.rexpenses`.
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV)
            && !dir.trim().is_empty()
        {
            return expand_tilde(&dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rexpenses")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rexpenses.conf")
    }

    /// Return the full path of the default SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rexpenses.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if !is_test {
            let mut cfg = Self::load()?;
            cfg.database = db_path.to_string_lossy().to_string();
            cfg.save_to(&Self::config_file())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\nport: 8080\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.currency_symbol, "₹");
        assert!(!cfg.cookie_secure);
        assert!(cfg.session_key_file.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = env::temp_dir().join("rexpenses_cfg_round_trip.conf");
        fs::remove_file(&path).ok();

        let cfg = Config {
            database: "/tmp/rexpenses_cfg.sqlite".into(),
            currency_symbol: "$".into(),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.database, "/tmp/rexpenses_cfg.sqlite");
        assert_eq!(loaded.currency_symbol, "$");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = env::temp_dir().join("rexpenses_cfg_malformed.conf");
        fs::write(&path, "port: [not a number").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
        fs::remove_file(&path).ok();
    }
}
