use std::path::PathBuf;

use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::InvalidCellPolicy;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/presupuesto.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub year: i32,
    pub download_dir: PathBuf,
    pub invalid_cells: InvalidCellPolicy,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api/".to_string(),
            year: chrono::Local::now().year(),
            download_dir: PathBuf::from("."),
            invalid_cells: InvalidCellPolicy::default(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "presupuesto", about = "Annual budget projections", disable_version_flag = true)]
pub struct Cli {
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
struct Overrides {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    config: Option<String>,
    /// Override base URL of the API (e.g. http://127.0.0.1:3000/api/).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Budget year to work on.
    #[arg(long, short, global = true)]
    year: Option<i32>,
    /// Directory where exports are written.
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,
    /// What to do with cells that are not valid amounts.
    #[arg(long, global = true, value_enum)]
    invalid_cells: Option<CellPolicyArg>,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CellPolicyArg {
    Coerce,
    Reject,
}

impl From<CellPolicyArg> for InvalidCellPolicy {
    fn from(value: CellPolicyArg) -> Self {
        match value {
            CellPolicyArg::Coerce => InvalidCellPolicy::Coerce,
            CellPolicyArg::Reject => InvalidCellPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the matrix of the year with its totals.
    Show {
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Write cells and save. Each edit is CATEGORY_ID:MONTH=AMOUNT.
    Set {
        #[arg(required = true)]
        edits: Vec<String>,
    },
    /// Print the first records of a CSV file without uploading it.
    Preview { file: PathBuf },
    /// Upload a CSV file, replacing the projections of the year.
    Import { file: PathBuf },
    /// Download the CSV of the year into the download directory.
    Export,
    /// Interactive editor over the matrix of the year.
    Edit,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let cli = Cli::parse();
    let settings = resolve(&cli.overrides)?;
    Ok((settings, cli.command))
}

fn resolve(args: &Overrides) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("PRESUPUESTO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(year) = args.year {
        settings.year = year;
    }
    if let Some(download_dir) = &args.download_dir {
        settings.download_dir.clone_from(download_dir);
    }
    if let Some(policy) = args.invalid_cells {
        settings.invalid_cells = policy.into();
    }
    if let Some(level) = &args.level {
        settings.level.clone_from(level);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_values_are_overridden_by_flags() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "base_url = \"http://budget.local/api/\"\nyear = 2024\ninvalid_cells = \"reject\"\nlevel = \"debug\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "presupuesto",
            "--config",
            &path,
            "--year",
            "2026",
            "show",
        ])
        .unwrap();
        let settings = resolve(&cli.overrides).unwrap();

        assert_eq!(settings.base_url, "http://budget.local/api/");
        assert_eq!(settings.year, 2026);
        assert_eq!(settings.invalid_cells, InvalidCellPolicy::Reject);
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.download_dir, PathBuf::from("."));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cli = Cli::try_parse_from([
            "presupuesto",
            "export",
            "--config",
            "/nonexistent/presupuesto",
            "--invalid-cells",
            "coerce",
        ])
        .unwrap();
        let settings = resolve(&cli.overrides).unwrap();

        assert_eq!(settings.invalid_cells, InvalidCellPolicy::Coerce);
        assert!(matches!(cli.command, Command::Export));
    }

    #[test]
    fn set_requires_edits() {
        assert!(Cli::try_parse_from(["presupuesto", "set"]).is_err());
        let cli = Cli::try_parse_from(["presupuesto", "set", "1:3=1,000"]).unwrap();
        assert!(matches!(cli.command, Command::Set { edits } if edits == ["1:3=1,000"]));
    }
}
