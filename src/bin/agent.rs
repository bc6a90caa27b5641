use anyhow::Context;
use clap::Parser;
use resource_registry::{
    actors::reporter::{ReporterConfig, ReporterHandle},
    monitors::SystemSource,
    util::{get_default_port, get_interval},
};
use sysinfo::System;
use tracing::{info, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Base URL of the hub
    #[arg(long)]
    hub: Option<String>,

    /// Identity to report under (default: host name)
    #[arg(short, long)]
    identity: Option<String>,

    /// Reporting interval in seconds (default: $AGENT_INTERVAL or 15)
    #[arg(short = 'n', long)]
    interval: Option<u64>,

    /// Connection descriptor reported alongside the metrics
    #[arg(short, long, default_value = "tcp")]
    conn: String,
}

fn init() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(true),
        )
        .with(filter::LevelFilter::DEBUG)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let identity = args
        .identity
        .or_else(System::host_name)
        .context("no identity given and host name unavailable")?;

    let config = ReporterConfig {
        hub_url: args
            .hub
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", get_default_port())),
        identity,
        interval: args.interval.unwrap_or_else(get_interval),
    };

    info!(
        "reporting as {} to {} every {}s",
        config.identity, config.hub_url, config.interval
    );

    let reporter = ReporterHandle::spawn(config, Box::new(SystemSource::new(args.conn)))?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    reporter.shutdown().await?;

    Ok(())
}
