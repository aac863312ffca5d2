//! Web server that keeps the next Simbio waste collection dates fresh in the background.

mod app;
mod config;
mod ui;

use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use odvoz_core::{scheduler::RefreshScheduler, scrape::Scraper, store::SnapshotStore};
use odvoz_provider_simbio as simbio;
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    setup_logging(config.verbose);
    config.validate().context("invalid configuration")?;

    // Refresh pipeline
    let store = SnapshotStore::new();
    let scraper = Scraper::new(
        simbio::driver(config.chromium_options()),
        simbio::target(),
        config.scrape_settings(),
        store.clone(),
    );
    let (stop, shutdown) = watch::channel(false);
    let refresher =
        RefreshScheduler::new(Arc::new(scraper), config.refresh_interval()).spawn(shutdown);

    // HTTP surface
    let state = AppState::new(store, config.static_dir.clone());
    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new().configure(move |cfg| state.configure(cfg))
    })
    .bind(config.listen)
    .with_context(|| format!("failed to bind {}", config.listen))?
    .run();

    info!(listen = %config.listen, "server running");
    let served = server.await.context("http server failed");

    // Stop refreshing once the server has shut down.
    if stop.send(true).is_err() {
        debug!("refresh scheduler already stopped");
    }
    refresher.abort();

    served
}

/// Filter used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "odvoz=debug" } else { "odvoz=info" }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_err| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
