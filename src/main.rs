mod calc;
mod cmd;
mod data;
mod remote;
mod ui;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const LOG_ENV: &str = "TRIPCAL_LOG";

#[derive(Parser)]
#[command(name = "tripcal", about = "trip planning calendar")]
struct Cli {
    /// Path to the data directory containing config and holiday files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Trip store URL; overrides `settings.endpoint` from config.yaml
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data files with defaults
    Init,
    /// List all saved trips
    Trips,
    /// List all holidays and make-up workdays
    Holidays,
    /// Save a trip and confirm it reached the store
    Save {
        /// First day of the trip (YYYY-MM-DD)
        start: NaiveDate,
        /// Last day of the trip (YYYY-MM-DD)
        end: NaiveDate,
        /// Existing trip id to update
        #[arg(long)]
        id: Option<String>,
    },
    /// Delete a trip by id
    Delete {
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works
    // regardless of future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty — running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let mut settings = data::AppSettings::load()?;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = Some(endpoint);
    }

    if !is_init_command {
        if let Err(e) = setup_logging(&data_dir.join(&settings.log_file)) {
            eprintln!("Logging disabled: {e:#}");
        }
        info!("tripcal started with data dir {}", data_dir.display());
    }

    match cli.command {
        None => cmd::root::run(&settings),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Trips) => cmd::trips::run(&settings),
        Some(Commands::Holidays) => cmd::holidays::run(),
        Some(Commands::Save { start, end, id }) => {
            cmd::save::run(&settings, id.as_deref(), start, end)
        }
        Some(Commands::Delete { id }) => cmd::delete::run(&settings, &id),
    }
}

/// Sends log records to `path`; the terminal belongs to the TUI.
fn setup_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filters = std::env::var(LOG_ENV).unwrap_or_else(|_| "tripcal=info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dir_needs_init_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("does_not_exist");
        assert!(dir_needs_init(&missing));
    }

    #[test]
    fn test_dir_needs_init_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_dir_needs_init_nonempty_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("file.txt"), "data").unwrap();
        assert!(!dir_needs_init(tmp.path()));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_save_dates() {
        let cli = Cli::try_parse_from(["tripcal", "save", "2025-06-05", "2025-06-20", "--id", "T1"]).unwrap();
        match cli.command {
            Some(Commands::Save { start, end, id }) => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
                assert_eq!(id.as_deref(), Some("T1"));
            }
            _ => panic!("expected save command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["tripcal", "save", "June 5", "2025-06-20"]).is_err());
    }

    #[test]
    fn test_cli_endpoint_flag_is_global() {
        let cli = Cli::try_parse_from(["tripcal", "trips", "--endpoint", "http://localhost/exec"]).unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost/exec"));
    }
}
