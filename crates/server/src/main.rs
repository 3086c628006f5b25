//! offline-cache entry point.
//!
//! Runs one lifecycle event per invocation, or serves JSON events on stdio.
//! Logging goes to stderr so stdout only carries replies.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use offline_client::{FetchClient, FetchConfig};
use offline_core::{AppConfig, CacheDb};
use offline_worker::{OfflineCache, Outcome};
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod handler;
mod output;

use cli::{Cli, Commands};
use output::Reply;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database {}", config.db_path.display()))?;

    tracing::info!(cache = %config.cache_name, origin = %config.origin, "offline-cache starting");

    if let Commands::Caches = cli.command {
        let stats = db.store_stats().await?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let network = Arc::new(FetchClient::new(FetchConfig::from(&config))?);
    let worker = OfflineCache::new(config, db, network)?;

    if let Commands::Serve = cli.command {
        return handler::serve_stdio(&worker).await;
    }

    let Some(event) = cli.command.to_event() else {
        return Ok(());
    };

    let result = worker.handle(event).await;
    worker.settle().await;

    if let (Ok(Outcome::Fetched(fetched)), Commands::Fetch { output: Some(path), .. }) = (&result, &cli.command) {
        tokio::fs::write(path, &fetched.response.body)
            .await
            .with_context(|| format!("writing body to {}", path.display()))?;
    }

    let reply = Reply::from(result);
    let failed = !reply.is_ok();
    handler::write_reply(&mut tokio::io::stdout(), &reply).await?;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
