//! Setup entry point: drops and recreates the warehouse database and its
//! tables. Destructive, meant to run once before loading.

use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::warehouse::{initialize_database, reset_schema};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "create-tables")]
#[command(about = "Drop and recreate the warehouse database and all of its tables")]
struct CliArgs {
    /// Directory holding the warehouse database. Must exist.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// File name of the warehouse database inside the database directory.
    #[clap(long)]
    pub db_file_name: Option<String>,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        db_dir: cli_args.db_dir,
        db_file_name: cli_args.db_file_name,
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let conn = initialize_database(&config.db_dir, &config.db_file_name)?;
    reset_schema(&conn)?;
    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close the warehouse database")?;

    info!("Warehouse ready at {:?}", config.db_path());
    Ok(())
}
