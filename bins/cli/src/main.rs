//! Ledgerwright command-line runner.
//!
//! Loads a JSON snapshot, runs one workflow step against it and writes the
//! snapshot back.

mod args;
mod commands;
mod seed;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerwright_shared::AppConfig;
use ledgerwright_shared::config::LoggingConfig;
use ledgerwright_store::MemoryStore;

use crate::args::{Cli, Command};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let mut store = if matches!(cli.command, Command::SeedDemo) {
        MemoryStore::new()
    } else {
        MemoryStore::load(&cli.snapshot)?
    };

    let report = commands::execute(&mut store, cli.command, &config)?;
    store.save(&cli.snapshot)?;
    info!(snapshot = %cli.snapshot.display(), "snapshot written");

    println!("{report}");
    Ok(())
}

/// Logs go to stderr so that stdout only carries the report.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
