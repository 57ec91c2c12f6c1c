//! Load entry point: walks the song catalog and the event logs and loads
//! them into an existing warehouse created by `create-tables`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::etl::{
    process_data, FileProcessor, LogFileProcessor, ProcessReport, SongFileProcessor,
};
use sparkify_etl::warehouse::{open_warehouse, store::get_counts};
use std::path::{Path, PathBuf};
use tracing::{error, info, level_filters::LevelFilter, warn};
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
#[command(name = "sparkify-etl")]
#[command(about = "Load song catalog and event log files into the warehouse")]
struct CliArgs {
    /// Directory holding the warehouse database.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// File name of the warehouse database inside the database directory.
    #[clap(long)]
    pub db_file_name: Option<String>,

    /// Root directory of the song catalog files.
    #[clap(long, value_parser = parse_path)]
    pub song_data: Option<PathBuf>,

    /// Root directory of the event log files.
    #[clap(long, value_parser = parse_path)]
    pub log_data: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            db_file_name: self.db_file_name.clone(),
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
        }
    }
}

/// Runs one directory through a processor. Returns the number of failed files
/// and unreadable entries, counting an unwalkable root as one failure.
fn run_stage(
    conn: &mut rusqlite::Connection,
    root: &Path,
    processor: &dyn FileProcessor,
) -> usize {
    info!("Loading {} files from {}...", processor.name(), root.display());
    match process_data(conn, root, processor) {
        Ok(report) => {
            log_report(processor.name(), &report);
            report.failures.len()
        }
        Err(e) => {
            error!("Could not load {}: {}", root.display(), e);
            1
        }
    }
}

fn log_report(name: &str, report: &ProcessReport) {
    let rows = &report.rows;
    info!(
        "{} files: {} found, {} loaded, {} failed",
        name,
        report.files_found,
        report.files_loaded,
        report.failures.len()
    );
    info!(
        "  new rows: {} songs, {} artists, {} time, {} songplays ({} matched), {} user upserts",
        rows.songs, rows.artists, rows.time_rows, rows.songplays, rows.matched_songplays, rows.users
    );
    if rows.skipped_events > 0 {
        info!("  {} non song play events skipped", rows.skipped_events);
    }
    if rows.rejected_events > 0 {
        warn!("  {} song plays rejected for bad user ids", rows.rejected_events);
    }
    if rows.ignored_records > 0 {
        warn!("  {} extra catalog records ignored", rows.ignored_records);
    }
    for failure in &report.failures {
        warn!("  failed: {}: {}", failure.path.display(), failure.error);
    }
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
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let mut conn = open_warehouse(&config.db_path())?;

    // Songs go first, the event lookup needs them.
    let mut failed_files = run_stage(&mut conn, &config.song_data, &SongFileProcessor);
    failed_files += run_stage(&mut conn, &config.log_data, &LogFileProcessor);

    let counts = get_counts(&conn).context("Failed to count warehouse rows")?;
    info!("");
    info!("Warehouse contains:");
    info!("  {} songs", counts.songs);
    info!("  {} artists", counts.artists);
    info!("  {} users", counts.users);
    info!("  {} time rows", counts.time);
    info!("  {} songplays", counts.songplays);

    if failed_files > 0 {
        bail!(
            "{} input files or directories failed to load, see the log above",
            failed_files
        );
    }
    info!("Load completed successfully!");
    Ok(())
}
