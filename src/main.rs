use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;

use songs_scraper::app::ports::ChartSurface;
use songs_scraper::app::scrape_use_case::{chart_from_store, RunOutcome, ScrapeUseCase};
use songs_scraper::config::Config;
use songs_scraper::infra::{ReqwestFetcher, SqliteStore, TextBarChart};
use songs_scraper::logging;

#[derive(Parser)]
#[command(name = "songs_scraper")]
#[command(about = "Scrape the most-streamed songs table into SQLite and chart the top 10")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, clean, store and chart (the default)
    Run,
    /// Redraw the chart from the stored table without fetching
    Chart,
}

/// The configured chart destination: a file when set, the terminal otherwise.
/// A file is only created once the chart is drawn.
fn chart_surface(config: &Config) -> Box<dyn ChartSurface> {
    let surface: Box<dyn ChartSurface> = match &config.chart.output {
        Some(path) => Box::new(TextBarChart::to_file(path)),
        None => Box::new(TextBarChart::stdout()),
    };
    surface
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let fetcher = ReqwestFetcher::new(&config.source.user_agent)?;
    let database_path = config.storage.database_path.clone();
    let use_case = ScrapeUseCase::new(
        Box::new(fetcher),
        config.source.url.clone(),
        config.storage.table_name.clone(),
        database_path.display().to_string(),
    );

    let mut surface = chart_surface(config);
    let mut console = io::stdout();
    let outcome = use_case
        .run(
            || SqliteStore::open(&database_path),
            surface.as_mut(),
            &mut console,
        )
        .await?;

    match outcome {
        RunOutcome::Stored { rows } => info!(rows, "Run finished"),
        RunOutcome::TableNotFound => info!("Run finished without a table"),
    }
    Ok(())
}

fn chart(config: &Config) -> anyhow::Result<()> {
    let store = SqliteStore::open_read_only(&config.storage.database_path).with_context(|| {
        format!(
            "opening database {}",
            config.storage.database_path.display()
        )
    })?;
    let mut surface = chart_surface(config);
    let bars = chart_from_store(&store, &config.storage.table_name, surface.as_mut())
        .with_context(|| format!("reading table {}", config.storage.table_name))?;
    info!(bars, "Chart redrawn from store");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(db) = cli.db {
        config.storage.database_path = db;
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config).await,
        Commands::Chart => chart(&config),
    }
}
