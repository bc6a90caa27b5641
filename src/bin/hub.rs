use std::net::IpAddr;

use anyhow::Context;
use clap::Parser;
use resource_registry::{
    actors::registry::RegistryHandle,
    api::{ApiConfig, ApiState, spawn_api_server},
    util::{get_addr, get_port},
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Address to listen on (default: $HUB_ADDR or 0.0.0.0)
    #[arg(long)]
    addr: Option<IpAddr>,

    /// Port to listen on (default: $HUB_PORT or 34567)
    #[arg(short, long)]
    port: Option<u16>,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("resource_registry", LevelFilter::TRACE),
        ("registry_hub", LevelFilter::TRACE),
        ("tower_http", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = ApiConfig::new(
        args.addr.unwrap_or_else(get_addr),
        args.port.unwrap_or_else(get_port),
    );

    let registry = RegistryHandle::spawn();
    let addr = spawn_api_server(config, ApiState::new(registry.clone())).await?;
    info!("registry hub ready on {addr}");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    let stats = registry.get_stats().await?;
    info!(
        "shutting down with {} identities ({} updates applied, {} rejected)",
        stats.identities, stats.updates_applied, stats.updates_rejected
    );

    registry.shutdown().await?;

    Ok(())
}
