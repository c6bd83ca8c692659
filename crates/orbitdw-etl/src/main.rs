//! `orbitdw` — load launches, rockets and launchpads into a SQLite warehouse.
//!
//! Reads `orbitdw.toml` (or the path given with `--config`) and `ORBITDW_*`
//! environment variables, runs the pipeline once, and exits non-zero on any
//! fatal error.
//!
//! ```
//! orbitdw
//! orbitdw --store /var/lib/orbitdw/spacex.db --no-snapshot
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use orbitdw_etl::{EtlConfig, RunSummary, SnapshotSink, config::DEFAULT_CONFIG_FILE, run_with};
use orbitdw_source_http::HttpSource;
use orbitdw_store_sqlite::SqliteWarehouse;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Load launch data into a SQLite warehouse")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Warehouse file; overrides `store_path`.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Skip archiving raw payloads.
  #[arg(long)]
  no_snapshot: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut config = EtlConfig::load(&cli.config).context("failed to load configuration")?;
  if let Some(store) = cli.store {
    config.store_path = store;
  }
  if cli.no_snapshot {
    config.snapshot_dir = None;
  }

  let summary = run(&config).await?;

  tracing::info!(
    launches = summary.launches,
    rockets = summary.rocket_ids,
    launchpads = summary.launchpad_ids,
    inserted = summary.facts.inserted,
    skipped = summary.facts.skipped,
    orphans = summary.facts.orphans,
    "run complete"
  );

  Ok(())
}

/// Open the warehouse and run the pipeline once; `run_with` closes it.
async fn run(config: &EtlConfig) -> anyhow::Result<RunSummary> {
  let source = HttpSource::new(config.source_config()).context("failed to build HTTP client")?;

  let warehouse = SqliteWarehouse::open(&config.store_path)
    .await
    .with_context(|| format!("failed to open warehouse at {:?}", config.store_path))?;

  let snapshots = config.snapshot_dir().map(SnapshotSink::new);
  let summary = run_with(&source, warehouse, snapshots).await.context("pipeline run failed")?;

  Ok(summary)
}
