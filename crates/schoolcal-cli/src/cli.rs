//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use schoolcal_aggregator::Role;

/// schoolcal - School calendar at a glance
#[derive(Debug, Parser)]
#[command(name = "schoolcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SCHOOLCAL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Directory holding one `<table>.json` file per source table
    #[arg(long, env = "SCHOOLCAL_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Per-source fetch timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the merged calendar
    Calendar(CalendarArgs),

    /// Show the birthday board
    Birthdays(BirthdayArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the calendar command.
#[derive(Debug, Clone, clap::Args)]
pub struct CalendarArgs {
    /// Page to open: admin pages also report failed sources
    #[arg(long, default_value = "student")]
    pub role: Role,

    /// Classify relative to this date (YYYY-MM-DD) instead of now
    #[arg(long)]
    pub now: Option<NaiveDate>,

    /// Only show events on this date (YYYY-MM-DD)
    #[arg(long)]
    pub on: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Maximum title length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,
}

impl Default for CalendarArgs {
    fn default() -> Self {
        Self {
            role: Role::Student,
            now: None,
            on: None,
            json: false,
            max_title_length: None,
        }
    }
}

/// Arguments for the birthdays command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BirthdayArgs {
    /// Classify relative to this date (YYYY-MM-DD) instead of now
    #[arg(long)]
    pub now: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_calendar_flags() {
        let cli = Cli::parse_from([
            "schoolcal",
            "calendar",
            "--role",
            "admin",
            "--now",
            "2024-04-15",
            "--json",
        ]);
        let Some(Command::Calendar(args)) = cli.command else {
            panic!("expected calendar command");
        };
        assert_eq!(args.role, Role::Admin);
        assert_eq!(args.now, NaiveDate::from_ymd_opt(2024, 4, 15));
        assert!(args.json);
        assert!(args.on.is_none());
    }

    #[test]
    fn role_defaults_to_student() {
        let cli = Cli::parse_from(["schoolcal", "calendar"]);
        let Some(Command::Calendar(args)) = cli.command else {
            panic!("expected calendar command");
        };
        assert_eq!(args.role, Role::Student);
    }

    #[test]
    fn rejects_bad_dates_and_roles() {
        assert!(Cli::try_parse_from(["schoolcal", "calendar", "--now", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["schoolcal", "calendar", "--role", "teacher"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["schoolcal", "birthdays", "--data-dir", "/srv/school", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/school")));
        assert!(cli.debug);
    }
}
