use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rexpenses.
/// Self-hosted expense tracker backed by SQLite.
#[derive(Parser)]
#[command(
    name = "rexpenses",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small expense tracker: web dashboard, monthly goals, spreadsheet import/export on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Run configuration file migrations if needed")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE", help = "Absolute path of the backup file")]
        file: String,

        #[arg(long, help = "Replace the copy with a zip archive")]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Export one user's expenses
    Export {
        #[arg(long, value_name = "USERNAME")]
        user: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "all, YYYY, YYYY-MM, YYYY-MM-DD or a start:end range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import expenses from an .xlsx/.xls/.csv file
    Import {
        #[arg(long, value_name = "USERNAME")]
        user: String,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Run the web server
    Serve {
        #[arg(long, value_name = "ADDR", help = "Bind address (default from config)")]
        bind: Option<String>,

        #[arg(long, value_name = "PORT", help = "Port (default from config)")]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_with_global_db() {
        let cli = Cli::try_parse_from([
            "rexpenses",
            "--db",
            "/tmp/x.sqlite",
            "export",
            "--user",
            "ana",
            "--format",
            "pdf",
            "--file",
            "/tmp/out.pdf",
            "--range",
            "2025-10",
        ])
        .unwrap();

        assert_eq!(cli.db.as_deref(), Some("/tmp/x.sqlite"));
        match cli.command {
            Commands::Export {
                user,
                format,
                range,
                force,
                ..
            } => {
                assert_eq!(user, "ana");
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(range.as_deref(), Some("2025-10"));
                assert!(!force);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn unknown_export_format_is_rejected() {
        let res = Cli::try_parse_from([
            "rexpenses", "export", "--user", "a", "--format", "docx", "--file", "/tmp/x",
        ]);
        assert!(res.is_err());
    }
}
