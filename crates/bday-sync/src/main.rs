//! baikal-birthday-sync binary.
//!
//! Opens the Baïkal SQLite database (first positional argument, else
//! `BDAY_SYNC_STORE_PATH`, else the default install path) and syncs contact
//! birthdays into the first principal's birthday calendar. Exits non-zero
//! on any fatal error.

use std::path::PathBuf;

use anyhow::Context as _;
use bday_store_sqlite::SqliteStore;
use bday_sync::SyncConfig;
use chrono::Utc;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Sync contact birthdays into a Baïkal calendar")]
struct Cli {
  /// Path to the Baïkal SQLite database.
  store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries the result lines only.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut config = SyncConfig::load().context("failed to read configuration")?;
  if let Some(store_path) = cli.store {
    config.store_path = store_path;
  }

  let store = SqliteStore::open(&config.store_path, config.busy_timeout())
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  let result = bday_sync::run(&store, &config, Utc::now()).await;
  let closed = store.close().await;
  let outcome = result.context("birthday sync failed")?;
  closed.context("failed to close store")?;

  let report = outcome.report;
  if outcome.candidates == 0 {
    println!("No contacts with birthdays found");
  }
  println!(
    "Synced {} birthdays ({} created, {} updated, {} unchanged, {} deleted)",
    report.processed(),
    report.created,
    report.updated,
    report.unchanged,
    report.deleted,
  );

  Ok(())
}
