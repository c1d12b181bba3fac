//! Radar overlay service.
//!
//! Runs the refresh scheduler for one region and serves the current overlay.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use radar_overlay::config::load_region;
use radar_overlay::server::run_server;
use radar_overlay::{
    AcquisitionCycle, CycleSettings, CycleStats, HttpFetcher, LayerStack, OverlayManager, Scheduler,
    ServerState,
};

#[derive(Parser, Debug)]
#[command(name = "radar-overlay")]
#[command(about = "Fetch, colorize and publish radar overlays")]
struct Args {
    /// Configuration directory (holds regions/ and styles/)
    #[arg(long, env = "RADAR_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Region id to run
    #[arg(long, env = "RADAR_REGION", default_value = "alaska")]
    region: String,

    /// Listen address
    #[arg(short, long, env = "RADAR_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Scratch directory for spooled payloads
    #[arg(long, env = "RADAR_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Do not start the HTTP server
    #[arg(long)]
    no_server: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let region = load_region(&args.config_dir, &args.region)?;
    let ramp = region.ramp(&args.config_dir)?;

    info!(
        region = %region.region.id,
        url = %region.source.url,
        refresh_secs = region.schedule.refresh_secs,
        "Starting radar overlay service"
    );

    let fetcher = Arc::new(HttpFetcher::new(region.source.timeout(), region.source.cache_bust)?);

    let settings = CycleSettings {
        source_url: region.source.url.clone(),
        gzip: region.source.gzip,
        bounds: region.bounds,
        title: region.region.name.clone(),
        scratch_dir: args.scratch_dir.clone().unwrap_or_else(std::env::temp_dir),
    };
    let cycle = AcquisitionCycle::new(fetcher.clone(), ramp.clone(), settings);

    let stack = Arc::new(LayerStack::new());
    let stats = Arc::new(CycleStats::new());
    let mut manager = OverlayManager::new(
        stack.clone(),
        region.overlay.reject_out_of_order,
        stats.clone(),
    );
    let scheduler = Scheduler::new(cycle, region.schedule.refresh());

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown.cancel();
    });

    if args.once {
        let applied = scheduler.run_once(&mut manager, &token).await;
        info!(?applied, "Single cycle finished");
        token.cancel();
        return Ok(());
    }

    let server = if args.no_server {
        None
    } else {
        let listen: SocketAddr = args.listen.parse().context("Invalid listen address")?;
        let state = Arc::new(ServerState {
            region_id: region.region.id.clone(),
            title: region.region.name.clone(),
            opacity: region.overlay.opacity,
            stack: stack.clone(),
            stats: stats.clone(),
            fetcher,
            ramp: Arc::new(ramp),
            prometheus: Some(prometheus_handle),
        });
        Some(tokio::spawn(run_server(state, listen, token.clone())))
    };

    let manager = scheduler.run_forever(manager, token.clone()).await?;

    if let Some(server) = server {
        match server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "API server exited with error"),
            Err(e) => warn!(error = %e, "API server task failed"),
        }
    }

    let cycles = stats.snapshot();
    info!(
        published = cycles.published,
        fallback = cycles.fallback,
        failed = cycles.failed,
        last_updated = ?manager.last_updated(),
        "Shutdown complete"
    );

    Ok(())
}
