//! metaviu - ad-serving billboards in a headless scene
//!
//! Places the configured billboards, resolves their ads against the backend
//! and replays presence and click events.

mod config;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use metaviu_net::AdClient;
use simulation::{load_events, ScriptedEvent, Simulation};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless MetaViu billboard runner", long_about = None)]
struct Args {
    /// Billboard config (TOML); defaults to config/billboards.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the ad backend base URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Player entering the scene after ads resolve (repeatable)
    #[arg(long = "enter", value_name = "PLAYER")]
    enter: Vec<String>,

    /// Billboard to click after enter events (repeatable)
    #[arg(long = "click", value_name = "BILLBOARD_ID")]
    click: Vec<i64>,

    /// Player leaving the scene after clicks (repeatable)
    #[arg(long = "leave", value_name = "PLAYER")]
    leave: Vec<String>,

    /// JSON-lines event script replayed after the flag events
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print the resulting scene as JSON
    #[arg(long)]
    dump: bool,

    /// Time left for in-flight engagement reports before exiting
    #[arg(long, default_value_t = 500)]
    linger_ms: u64,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting metaviu v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    };
    if let Some(base_url) = &args.api_base_url {
        config.client.api_base_url = base_url.clone();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(args, config))
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    let client = AdClient::new(config.client.clone()).context("failed to build ad client")?;
    let mut sim = Simulation::new(&config, Arc::new(client));
    info!(billboards = sim.billboards().len(), "billboards placed");

    sim.resolve_all().await?;

    let mut events: Vec<ScriptedEvent> = Vec::new();
    events.extend(
        args.enter
            .iter()
            .map(|player| ScriptedEvent::Enter {
                player: player.clone(),
            }),
    );
    events.extend(
        args.click
            .iter()
            .map(|&billboard_id| ScriptedEvent::Click { billboard_id }),
    );
    events.extend(
        args.leave
            .iter()
            .map(|player| ScriptedEvent::Leave {
                player: player.clone(),
            }),
    );
    if let Some(path) = &args.events {
        events.extend(load_events(path)?);
    }

    for event in &events {
        let handled = sim.apply(event);
        info!(?event, handled, "event replayed");
    }

    if !events.is_empty() {
        tokio::time::sleep(Duration::from_millis(args.linger_ms)).await;
    }

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&sim.report())?);
    }
    Ok(())
}
